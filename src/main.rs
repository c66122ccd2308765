use std::io::Write;

fn main() -> std::io::Result<()> {
    // Logs go to stderr so they never mix with command replies
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        })
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();

    chess_search::uci::run_loop()
}
