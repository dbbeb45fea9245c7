use clap::Args;

use llmark_core::types::now_ms;

use super::{StoreArgs, format_age};

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Only bookmarks captured on this exact URL
    pub url: Option<String>,
}

pub async fn run(args: ListArgs) -> anyhow::Result<()> {
    let (store, _config) = args.store.open_existing()?;
    let marks = match &args.url {
        Some(url) => store.load_for_url(url).await,
        None => store.load_all().await,
    };

    if marks.is_empty() {
        println!("no bookmarks stored");
        return Ok(());
    }

    let now = now_ms();
    for bm in &marks {
        let age = format_age(now - bm.created_ms());
        println!("{:>15}  {:>7}  {:<52}  {}", bm.id, age, bm.title, bm.url);
    }
    println!();
    println!("{} bookmark(s)", marks.len());

    Ok(())
}
