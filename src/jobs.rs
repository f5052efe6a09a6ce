use crate::{
    modules::{home_ad, offer},
    types::Context,
};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

const EVERY_MINUTE: &str = "0 * * * * *";

async fn deactivate_expired_offers(ctx: Arc<Context>) {
    match offer::repository::deactivate_expired(&ctx.db_conn.pool).await {
        Ok(0) => (),
        Ok(count) => tracing::info!("Deactivated {} expired offers", count),
        Err(_) => tracing::error!("Failed to deactivate expired offers"),
    }
}

async fn delete_expired_home_ads(ctx: Arc<Context>) {
    match home_ad::repository::delete_expired(&ctx.db_conn.pool).await {
        Ok(0) => (),
        Ok(count) => tracing::info!("Deleted {} expired home ads", count),
        Err(_) => tracing::error!("Failed to delete expired home ads"),
    }
}

pub async fn start(ctx: Arc<Context>) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let offers_ctx = ctx.clone();
    scheduler
        .add(Job::new_async(EVERY_MINUTE, move |_, _| {
            let ctx = offers_ctx.clone();
            Box::pin(async move { deactivate_expired_offers(ctx).await })
        })?)
        .await?;

    let home_ads_ctx = ctx.clone();
    scheduler
        .add(Job::new_async(EVERY_MINUTE, move |_, _| {
            let ctx = home_ads_ctx.clone();
            Box::pin(async move { delete_expired_home_ads(ctx).await })
        })?)
        .await?;

    scheduler.start().await?;

    tracing::debug!("Scheduled jobs started");

    Ok(scheduler)
}
