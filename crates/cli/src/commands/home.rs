//! Home content command.

use cms_starter_client::{ResourceState, home_resource};

/// Fetch the home single type and print it as JSON.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let resource = home_resource(super::client()?);

    let ResourceState { data, error, .. } = resource.load().await;
    if let Some(message) = error {
        return Err(format!("Failed to load home page data: {message}").into());
    }

    #[allow(clippy::print_stdout)]
    {
        match data {
            Some(home) => println!("{}", serde_json::to_string_pretty(&home)?),
            None => println!("No Content"),
        }
    }
    Ok(())
}
