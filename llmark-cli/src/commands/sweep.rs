use clap::Args;

use llmark_core::sweep::RetentionSweeper;

use super::StoreArgs;

#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Report what would be evicted without writing
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: SweepArgs) -> anyhow::Result<()> {
    let (store, config) = args.store.open_existing()?;

    if args.dry_run {
        let now = llmark_core::types::now_ms();
        let ttl_ms = config.retention.ttl_ms();
        let marks = store.load_all().await;
        let expired: Vec<_> = marks
            .iter()
            .filter(|bm| now - bm.created_ms() > ttl_ms)
            .collect();
        for bm in &expired {
            println!("would evict {:>15}  {}", bm.id, bm.title);
        }
        println!("{} of {} bookmark(s) expired", expired.len(), marks.len());
        return Ok(());
    }

    let sweeper = RetentionSweeper::new(store, &config);
    let stats = sweeper.sweep().await?;
    println!(
        "swept {} bookmark(s): {} evicted{}",
        stats.scanned,
        stats.evicted,
        if stats.wrote { "" } else { " (store untouched)" }
    );

    Ok(())
}
