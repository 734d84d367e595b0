use parameter_sync::app::start;

#[tokio::main]
async fn main() {
    let code = start().await;
    std::process::exit(code);
}
