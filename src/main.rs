use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use futures_util::future::join_all;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cinefeed::application::{CatalogBrowser, ResolveTrailerUseCase};
use cinefeed::domain::entities::{CatalogItem, ItemId};
use cinefeed::domain::ports::{CatalogPort, ImageFetchPort};
use cinefeed::infrastructure::{
    AppConfig, CliArgs, Command, ImageFetchCache, ReqwestTransport, StorageManager,
    TmdbCatalogClient,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = match (StorageManager::new(), args.config.as_deref()) {
        (Ok(storage), _) => storage,
        (Err(_), Some(path)) => {
            StorageManager::with_dir(path.parent().map(Path::to_path_buf).unwrap_or_default())
        }
        (Err(e), None) => return Err(e.into()),
    };
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn print_items(items: &[CatalogItem]) {
    for item in items {
        println!("{:>8}  {:>4}  {}", item.id, item.rating_label(), item.title);
    }
}

async fn run(args: CliArgs, config: AppConfig) -> Result<()> {
    let token = config.api_token().ok_or_else(|| {
        eyre!(
            "no API token configured; set {} or pass --token",
            cinefeed::infrastructure::config::TOKEN_ENV
        )
    })?;

    let transport = Arc::new(ReqwestTransport::new()?);
    let client = Arc::new(TmdbCatalogClient::new(
        transport.clone(),
        token,
        config.catalog_config(),
    ));

    match args.command {
        Command::Popular { pages } => {
            let mut browser = CatalogBrowser::new(client.clone());
            browser.load_popular().await?;
            for _ in 1..pages {
                if !browser.load_next_page().await? {
                    break;
                }
            }
            print_items(browser.items());
            println!(
                "-- page {}/{} ({} items)",
                browser.current_page(),
                browser.total_pages(),
                browser.items().len()
            );
        }
        Command::Search { query, page } => {
            let result = client.search(&query, page).await?;
            print_items(&result.items);
            println!("-- page {}/{}", result.page_number, result.total_pages);
        }
        Command::Trailer { id } => {
            let use_case = ResolveTrailerUseCase::new(client.clone());
            let (trailer, url) = use_case.execute(ItemId(id)).await?;
            let name = trailer.video.name.as_deref().unwrap_or("trailer");
            println!("{name} ({})", trailer.video.kind);
            println!("{url}");
        }
        Command::Posters { page } => {
            let listing = client.list_popular(page).await?;
            let cache = ImageFetchCache::new(transport, config.image_fetch_config());

            let requests: Vec<_> = listing
                .items
                .iter()
                .filter_map(|item| {
                    let url = item.poster_url(client.image_base_url())?;
                    Some((item.title.clone(), cache.fetch_image(&url)))
                })
                .collect();

            let outcomes = join_all(requests.into_iter().map(|(title, request)| async move {
                (title, request.outcome().await)
            }))
            .await;

            for (title, outcome) in outcomes {
                match outcome {
                    Some(Ok(image)) => println!("{}x{}  {title}", image.width(), image.height()),
                    Some(Err(e)) => println!("failed  {title}: {e}"),
                    None => println!("cancelled  {title}"),
                }
            }
            println!("-- {}", cache.stats());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = cinefeed::VERSION, "Starting {}", cinefeed::NAME);

    run(args, config).await
}
