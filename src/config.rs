use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub inputs_dir: PathBuf,
    pub content_dir: PathBuf,
    pub site_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            data_dir: PathBuf::from("./data"),
            inputs_dir: PathBuf::from("./inputs"),
            content_dir: PathBuf::from("./content"),
            site_dir: PathBuf::from("./site"),
            static_dir: PathBuf::from("./static"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let dir = |key: &str, fallback: PathBuf| {
            env::var(key).map(PathBuf::from).unwrap_or(fallback)
        };

        Self {
            bind_addr: env::var("NOVELSHELF_BIND").unwrap_or(defaults.bind_addr),
            data_dir: dir("NOVELSHELF_DATA_DIR", defaults.data_dir),
            inputs_dir: dir("NOVELSHELF_INPUTS_DIR", defaults.inputs_dir),
            content_dir: dir("NOVELSHELF_CONTENT_DIR", defaults.content_dir),
            site_dir: dir("NOVELSHELF_SITE_DIR", defaults.site_dir),
            static_dir: dir("NOVELSHELF_STATIC_DIR", defaults.static_dir),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("novels.db")
    }

    pub fn sqlite_dsn(&self) -> String {
        format!("sqlite://{}", self.database_path().display())
    }
}
