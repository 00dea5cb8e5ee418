use clap::Parser;
use tracing_subscriber::EnvFilter;

use wav_hide::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_compare, handle_extract, handle_hide, handle_resize},
};

/// 程序的主入口点
///
/// 负责初始化日志、解析命令行参数，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 诊断日志写到 stderr，级别由 RUST_LOG 控制
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Extract(args) => handle_extract(args),
        Commands::Capacity(args) => handle_capacity(args),
        Commands::Resize(args) => handle_resize(args),
        Commands::Compare(args) => handle_compare(args),
    }
}
