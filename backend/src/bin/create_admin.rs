//! Seeds an admin account from ADMIN_EMAIL / ADMIN_PASSWORD.
//!
//! Run once after migrations. Exits without changes if the email is
//! already registered.

use storefront_backend::{
    config::Config,
    db::connection::create_pool,
    models::user::{NewUser, UserGroupName},
    repositories::user as user_repo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let email = std::env::var("ADMIN_EMAIL")
        .map_err(|_| anyhow::anyhow!("ADMIN_EMAIL must be set"))?;
    let password = std::env::var("ADMIN_PASSWORD")
        .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set"))?;

    let email = email.trim().to_lowercase();
    if user_repo::find_user_by_email(&pool, &email).await?.is_some() {
        tracing::warn!("User with this email already exists, nothing to do");
        return Ok(());
    }

    user_repo::ensure_user_groups(&pool).await?;
    let admin_group = user_repo::find_group_by_name(&pool, UserGroupName::Admin)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Admin group missing after seeding"))?;

    let new_user = NewUser::create(&email, &password, admin_group.id)
        .map_err(|err| anyhow::anyhow!("Invalid admin credentials: {:?}", err))?;
    let user = user_repo::insert_user(&pool, &new_user, true)
        .await
        .map_err(|err| anyhow::anyhow!("Failed to create admin: {:?}", err))?;

    tracing::info!(user_id = user.id, "Admin user created successfully");
    Ok(())
}
