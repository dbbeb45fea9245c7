use std::collections::BTreeMap;

use clap::Args;

use llmark_core::types::now_ms;

use super::{StoreArgs, format_age};

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run(args: StatusArgs) -> anyhow::Result<()> {
    let (store, config) = args.store.open_existing()?;
    let marks = store.load_all().await;

    println!("LLMark store: {}", args.store.store.display());
    println!();
    println!("  Bookmarks: {} total", marks.len());
    println!("  TTL:       {} days", config.retention.ttl_days);

    if marks.is_empty() {
        println!();
        println!("  no bookmarks stored");
        return Ok(());
    }

    let now = now_ms();
    if let Some(oldest) = marks.iter().map(|bm| now - bm.created_ms()).max() {
        println!("  Oldest:    {}", format_age(oldest));
    }

    let mut by_url: BTreeMap<&str, usize> = BTreeMap::new();
    for bm in &marks {
        *by_url.entry(bm.url.as_str()).or_default() += 1;
    }
    println!();
    println!("  Documents:");
    for (url, count) in by_url {
        println!("    {count:>4}  {url}");
    }

    Ok(())
}
