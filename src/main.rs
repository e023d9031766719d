#[tokio::main]
async fn main() {
    stayhub_backend::run().await;
}
