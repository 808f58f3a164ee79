//! Command implementations for the solaredge CLI

use anyhow::Result;
use serde_json::Value;
use solaredge_client::{MonitoringClient, SiteListQuery};
use tracing::debug;

use crate::Commands;

/// Run one subcommand and return the document the API answered with
pub async fn run(client: &MonitoringClient, command: &Commands) -> Result<Value> {
    debug!(?command, "Running command");

    let document = match command {
        Commands::List {
            size,
            start_index,
            search,
            sort_property,
            sort_order,
            status,
        } => {
            let query = SiteListQuery {
                size: *size,
                start_index: *start_index,
                search_text: search.clone(),
                sort_property: sort_property.clone(),
                sort_order: *sort_order,
                status: status.clone(),
            };
            client.get_list(&query).await?
        }

        Commands::Details { site } => client.get_details(*site).await?,

        Commands::DataPeriod { site } => client.get_data_period(*site).await?,

        Commands::Energy { range, time_unit } => {
            client
                .get_energy(range.site, range.start, range.end, *time_unit)
                .await?
        }

        Commands::TimeFrameEnergy { range, time_unit } => {
            client
                .get_time_frame_energy(range.site, range.start, range.end, *time_unit)
                .await?
        }

        Commands::Power { window } => {
            client
                .get_power(window.site, window.start, window.end)
                .await?
        }

        Commands::Overview { site } => client.get_overview(*site).await?,

        Commands::PowerDetails { window, meters } => {
            client
                .get_power_details(window.site, window.start, window.end, meters.as_slice())
                .await?
        }

        Commands::EnergyDetails {
            window,
            meters,
            time_unit,
        } => {
            client
                .get_energy_details(
                    window.site,
                    window.start,
                    window.end,
                    meters.as_slice(),
                    *time_unit,
                )
                .await?
        }

        Commands::PowerFlow { site } => client.get_current_power_flow(*site).await?,

        Commands::Storage { window, serials } => {
            client
                .get_storage_data(window.site, window.start, window.end, serials.as_slice())
                .await?
        }
    };

    Ok(document)
}
