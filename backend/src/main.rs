//! Backend entry-point: loads settings, selects adapters, and serves the SOS API.

mod server;

use std::ffi::OsString;
use std::net::SocketAddr;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use carefever_backend::inbound::http::health::HealthState;
use server::settings::{DispatchSettings, ServerSettings, TwilioSettings};
use server::{ServerConfig, build_contact_store, build_transport, create_server};

fn program_args() -> [OsString; 1] {
    [OsString::from("carefever-backend")]
}

fn settings_error(name: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("failed to load {name} settings: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let server_settings = ServerSettings::load_from_iter(program_args())
        .map_err(|err| settings_error("server", err))?;
    let dispatch_settings = DispatchSettings::load_from_iter(program_args())
        .map_err(|err| settings_error("dispatch", err))?;
    let twilio_settings = TwilioSettings::load_from_iter(program_args())
        .map_err(|err| settings_error("Twilio", err))?;

    let contacts = build_contact_store(&server_settings);
    let transport = build_transport(&server_settings, &dispatch_settings, &twilio_settings)?;
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], server_settings.port));
    let config = ServerConfig::new(bind_addr, contacts, transport)
        .with_policy(dispatch_settings.policy());

    info!(%bind_addr, "starting SOS alert server");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
