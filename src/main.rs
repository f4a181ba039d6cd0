#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = kanban_board::logging::init() {
        eprintln!("{e}");
    }
    let args: Vec<String> = std::env::args().collect();
    kanban_board::run::run(args, None, None).await
}
