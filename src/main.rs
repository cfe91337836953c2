use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use barbershop_booking::config::AppConfig;
use barbershop_booking::models::Credentials;
use barbershop_booking::services::catalog::group_services_by_category;
use barbershop_booking::services::formatters::{
    format_appointment_date, format_currency, format_duration,
};
use barbershop_booking::services::upcoming::UpcomingAppointment;
use barbershop_booking::services::wizard::BookingWizard;
use barbershop_booking::state::AppState;

/// Usage: `barbershop-booking [service_id] [YYYY-MM-DD]`
///
/// Without arguments, lists the catalog. With a service id, prints the
/// available slots grouped by period for the given day (default: today).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let mut credentials = Credentials::new(config.access_token.clone(), config.refresh_token.clone());
    let state = Arc::new(AppState::from_config(config)?);

    let services = state
        .api
        .services("")
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if credentials.is_authenticated() {
        let card = UpcomingAppointment::load(Arc::clone(&state), &mut credentials).await;
        if let Some(next) = card.current() {
            let (date, time) = format_appointment_date(&next.date_time);
            println!(
                "Proximo agendamento: {} {} com {}",
                date,
                time,
                next.professional_name.as_deref().unwrap_or("-")
            );
        }
    }

    let mut args = std::env::args().skip(1);
    let Some(service_id) = args.next() else {
        for group in group_services_by_category(&services) {
            println!("{}", group.category_name);
            for service in &group.services {
                println!(
                    "  [{}] {} - {} ({})",
                    service.id,
                    service.name,
                    format_currency(&service.price),
                    format_duration(&service.duration)
                );
            }
        }
        return Ok(());
    };

    let service_id: i64 = service_id.parse()?;
    let service = services
        .into_iter()
        .find(|s| s.id == service_id)
        .ok_or_else(|| anyhow::anyhow!("service {service_id} not found"))?;

    let mut wizard = BookingWizard::new(Arc::clone(&state));
    wizard.select_service(service);
    if let Some(date) = args.next() {
        wizard
            .select_date(&date)
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    }

    let groups = wizard
        .load_slots()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if groups.is_empty() {
        println!("Nenhum horario disponivel.");
    }
    for group in groups {
        println!("{}: {}", group.label, group.slots.join(", "));
    }

    Ok(())
}
