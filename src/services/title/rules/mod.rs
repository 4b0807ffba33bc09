pub mod count;
pub mod digits;
pub mod markers;
pub mod prefix;
