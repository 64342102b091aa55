#[tokio::main]
async fn main() {
    powerlink_backend::run().await;
}
