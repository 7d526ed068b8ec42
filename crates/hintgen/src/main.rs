use hintgen::runtime::{boot, serve};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let builder = boot::boot()?;
    serve::serve(builder).await
}
