use anyhow::{anyhow, Context};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use feed_ingestor::configuration::Configuration;
use feed_ingestor::fetching::build_client;
use feed_ingestor::{ingestor, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init dotenv
    dotenvy::dotenv().ok();

    let subscriber = observability::get_subscriber("info");
    observability::init_subscriber(subscriber);

    let configuration = Configuration::from_env().context("Invalid configuration")?;
    let client = build_client(configuration.fetch_timeout).context("Could not build client")?;

    if configuration.run_once {
        ingestor::run(&configuration, client).await?;
        return Ok(());
    }

    // Init scheduler
    let sched = JobScheduler::new()
        .await
        .map_err(|err| anyhow!("Could not create scheduler: {err:?}"))?;
    let schedule = configuration.schedule.clone();
    info!("Fetching on schedule {}", schedule);
    sched
        .add(
            Job::new_async(&schedule[..], move |_, _| {
                let configuration = configuration.clone();
                let client = client.clone();
                Box::pin(async move {
                    if let Err(err) = ingestor::run(&configuration, client).await {
                        error!("Scheduled run failed: {err}");
                    }
                })
            })
            .map_err(|err| anyhow!("Could not create fetching task: {err:?}"))?,
        )
        .await
        .map_err(|err| anyhow!("Could not schedule fetching task: {err:?}"))?;
    sched
        .start()
        .await
        .map_err(|err| anyhow!("Could not start scheduler: {err:?}"))?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}

