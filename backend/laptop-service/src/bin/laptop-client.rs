/// Laptop Client Entry Point
///
/// Logs in, keeps the access token fresh in the background, then:
/// - creates a few laptops (admin only)
/// - uploads an image for the first one when IMAGE_PATH is set (admin only)
/// - searches the catalog (public)
/// - rates the created laptops over one bidirectional stream (admin and user)
use anyhow::{Context, Result};
use grpc_jwt_propagation::TokenRefresher;
use laptop_service::{
    config::ClientSettings,
    grpc::{
        proto::{Cpu, Filter, Laptop, Memory, MemoryUnit},
        AuthClient, LaptopClient,
    },
    policy::auth_methods,
};
use tonic::transport::Channel;
use tower::Layer;
use tracing::info;

const SAMPLE_COUNT: u32 = 3;

fn sample_laptop(i: u32) -> Laptop {
    let (brand, name, cpu_name) = match i % 3 {
        0 => ("Apple", "Macbook Air", "Core i7-9750H"),
        1 => ("Dell", "XPS 13", "Core i5-9400F"),
        _ => ("Lenovo", "Thinkpad X1", "Ryzen 7 PRO 2700U"),
    };
    let cores = 4 + 2 * (i % 3);

    Laptop {
        id: String::new(),
        brand: brand.to_string(),
        name: name.to_string(),
        cpu: Some(Cpu {
            brand: if cpu_name.starts_with("Ryzen") { "AMD" } else { "Intel" }.to_string(),
            name: cpu_name.to_string(),
            number_cores: cores,
            number_threads: cores * 2,
            min_ghz: 2.0 + f64::from(i % 3) * 0.4,
            max_ghz: 4.0 + f64::from(i % 3) * 0.3,
        }),
        ram: Some(Memory {
            value: 8 << (i % 3),
            unit: MemoryUnit::Gigabyte as i32,
        }),
        price_usd: 1500.0 + f64::from(i) * 500.0,
        release_year: 2019 + i,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "laptop_client=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    let settings = ClientSettings::load().context("Failed to load configuration")?;
    info!("Dialing server {}", settings.server_addr);

    let channel = Channel::from_shared(settings.server_addr.clone())
        .context("Invalid SERVER_ADDR")?
        .connect()
        .await
        .context("Failed to connect to server")?;

    // Login traffic goes over the plain channel; catalog calls over the decorated one
    let auth_client = AuthClient::new(channel.clone(), &settings.username, &settings.password);
    let refresher = TokenRefresher::start(auth_client, settings.refresh.clone())
        .await
        .context("Initial login failed")?;
    info!(username = %settings.username, "Logged in");

    let laptops = LaptopClient::new(refresher.layer(auth_methods()).layer(channel));

    let mut ids = Vec::new();
    for i in 0..SAMPLE_COUNT {
        let id = laptops
            .create_laptop(sample_laptop(i))
            .await
            .context("CreateLaptop failed")?;
        ids.push(id);
    }

    if let (Some(path), Some(laptop_id)) = (&settings.image_path, ids.first()) {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        let image_type = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        laptops
            .upload_image(laptop_id, &image_type, &data)
            .await
            .context("UploadImage failed")?;
    }

    let filter = Filter {
        max_price_usd: 3000.0,
        min_cpu_cores: 4,
        min_cpu_ghz: 2.0,
        min_ram: Some(Memory {
            value: 8,
            unit: MemoryUnit::Gigabyte as i32,
        }),
    };
    let found = laptops
        .search_laptop(Some(filter))
        .await
        .context("SearchLaptop failed")?;
    info!(matches = found.len(), "Search finished");

    let ratings = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), 6.0 + i as f64))
        .collect();
    let responses = laptops
        .rate_laptop(ratings)
        .await
        .context("RateLaptop failed")?;
    info!(rated = responses.len(), "Rating finished");

    refresher.shutdown().await;
    Ok(())
}
