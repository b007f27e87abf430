use anyhow::{anyhow, Context, Result};
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appointment_cell::{AppointmentQuery, AppointmentService, ScheduledAppointment};
use doctor_cell::{DoctorQuery, DoctorService};
use patient_cell::{PatientQuery, PatientService};
use shared_config::ApiConfig;
use shared_models::Session;
use task_cell::{TaskQuery, TaskService};

const PAGE_LIMIT: u32 = 20;

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    if !config.is_configured() {
        return Err(anyhow!("CLINIC_API_URL must be set"));
    }
    if !config.is_auth_configured() {
        warn!("Identity provider not configured; relying on CLINIC_ACCESS_TOKEN alone");
    }

    // The identity provider's client owns login and refresh; this tool
    // only needs the current token.
    let session = Session::new(
        std::env::var("CLINIC_ACCESS_TOKEN").context("CLINIC_ACCESS_TOKEN must be set")?,
        std::env::var("CLINIC_USERNAME").unwrap_or_else(|_| "operator".to_string()),
    );

    info!("Querying clinic API as {}", session.username);

    let kind = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "appointments".to_string());

    match kind.as_str() {
        "patients" => list_patients(&config, &session).await,
        "doctors" => list_doctors(&config, &session).await,
        "appointments" => list_appointments(&config, &session).await,
        "tasks" => list_tasks(&config, &session).await,
        other => Err(anyhow!(
            "unknown resource kind {:?} (expected patients, doctors, appointments or tasks)",
            other
        )),
    }
}

async fn list_patients(config: &ApiConfig, session: &Session) -> Result<()> {
    let query = PatientQuery {
        limit: Some(PAGE_LIMIT),
        ..Default::default()
    };
    let page = PatientService::new(config).get(&query, session).await?;

    println!("{} patients total", page.count);
    for patient in page.items {
        let status = if patient.active { "active" } else { "inactive" };
        println!("#{:<6} {} ({})", patient.id, patient.name, status);
    }
    Ok(())
}

async fn list_doctors(config: &ApiConfig, session: &Session) -> Result<()> {
    let query = DoctorQuery {
        limit: Some(PAGE_LIMIT),
        ..Default::default()
    };
    let page = DoctorService::new(config).get(&query, session).await?;

    println!("{} doctors total", page.count);
    for doctor in page.items {
        println!(
            "#{:<6} Dr. {} [{}]",
            doctor.id,
            doctor.name,
            doctor.specialities.join(", ")
        );
    }
    Ok(())
}

async fn list_appointments(config: &ApiConfig, session: &Session) -> Result<()> {
    let service = AppointmentService::new(config);
    let query = AppointmentQuery {
        limit: Some(PAGE_LIMIT),
        ..Default::default()
    };
    let page = service.get(&query, session).await?;

    println!("{} appointments total", page.count);
    for appointment in page.items {
        let mut scheduled = ScheduledAppointment::new(appointment);
        service.load_doctor(&mut scheduled, session).await?;
        service.load_patient(&mut scheduled, session).await?;

        println!(
            "#{:<6} {} - {}  {}",
            scheduled.appointment.id,
            scheduled.appointment.start_time.format("%Y-%m-%d %H:%M"),
            scheduled.appointment.end_time.format("%H:%M"),
            scheduled.subject()
        );
    }
    Ok(())
}

async fn list_tasks(config: &ApiConfig, session: &Session) -> Result<()> {
    let query = TaskQuery {
        limit: Some(PAGE_LIMIT),
        ..Default::default()
    };
    let page = TaskService::new(config).get(&query, session).await?;

    println!("{} tasks total", page.count);
    for task in page.items {
        let marker = if task.complete { "x" } else { " " };
        println!("#{:<6} [{}] {}", task.id, marker, task.title);
    }
    Ok(())
}
