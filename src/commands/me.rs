use crate::cache::Cache;
use crate::client::JiraClient;
use crate::error::Result;
use crate::output;
use crate::types::User;

pub async fn fetch_myself(client: &JiraClient) -> Result<User> {
    client.get("/myself", &[]).await
}

/// Account id of the authenticated user, served from the cache when fresh.
pub async fn current_account_id(client: &JiraClient) -> Result<String> {
    let mut cache = Cache::load();
    if let Some(account) = cache.account(client.base_url()) {
        tracing::debug!(account = %account.account_id, name = %account.display_name, "using cached account id");
        return Ok(account.account_id.clone());
    }

    let me = fetch_myself(client).await?;
    cache.set_account(client.base_url(), me.account_id.clone(), me.display_name.clone());
    cache.save();

    Ok(me.account_id)
}

pub async fn show(client: &JiraClient) -> Result<()> {
    let me = fetch_myself(client).await?;

    let mut cache = Cache::load();
    cache.set_account(client.base_url(), me.account_id.clone(), me.display_name.clone());
    cache.save();

    output::print_item(&me, |me| {
        println!("{}", me.display_name);
        if let Some(email) = &me.email {
            println!("Email:      {email}");
        }
        println!("Account ID: {}", me.account_id);
        if let Some(tz) = &me.time_zone {
            println!("Time zone:  {tz}");
        }
        println!("Site:       {}", client.base_url());
    });

    Ok(())
}
