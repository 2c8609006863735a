use anyhow::Result;
use hybrid_rs::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--version") {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let cfg = match arg {
        Some(path) => Config::from_file(path)?,
        None => Config::new()?,
    };
    hybrid_rs::run(cfg)
}
