pub const UM_ENV_VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_SUFFIX: Option<&str> = option_env!("UM_ENV_REVISION");

pub fn get_version() -> String {
    // keep test transcripts stable across releases
    if cfg!(test) {
        return "vTEST".to_string();
    }
    let suffix = GIT_SUFFIX.unwrap_or("dev");
    format!("{UM_ENV_VERSION}-{suffix}")
}
