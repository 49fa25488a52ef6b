use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use rfp_pricing::config::environment::EnvironmentConfig;
use rfp_pricing::models::rfp::Rfp;
use rfp_pricing::routes::create_app;
use rfp_pricing::services::lane_generator;
use rfp_pricing::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rfp_pricing=debug,tower_http=info")),
        )
        .init();

    info!("🚛 RFP Pricing Workbench - Motor de tarifas");
    info!("==========================================");

    let config = EnvironmentConfig::from_env()?;
    if config.cors_origins.is_empty() && !config.is_development() {
        warn!("⚠️ CORS_ORIGINS vacío: se permite cualquier origen");
    }

    let app_state = AppState::new(config.clone());

    // Sembrar un RFP demo
    if config.demo_rfp_lanes > 0 {
        let lanes = lane_generator::generate_lanes(config.demo_rfp_lanes, &mut rand::thread_rng());
        let id = app_state
            .insert_rfp(Rfp::new("Demo Shipper".to_string(), lanes))
            .await;
        info!("🎲 RFP demo {} sembrado con {} lanes", id, config.demo_rfp_lanes);
    }

    let app = create_app(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("💲 Endpoints - Pricing:");
    info!("   POST /api/pricing/margin - Margen y cost stack de un lane");
    info!("   POST /api/pricing/classify - Clasificar un margen");
    info!("   POST /api/pricing/optimal-rate - Tarifa para un margen objetivo");
    info!("   POST /api/pricing/pre-solve - Pre-solve de lanes sueltos");
    info!("   POST /api/pricing/rate-check - Chequeo de tarifa alta");
    info!("   GET  /api/pricing/scenarios - Escenarios de pricing");
    info!("📋 Endpoints - RFP:");
    info!("   POST /api/rfp - Crear RFP");
    info!("   GET  /api/rfp - Listar RFPs");
    info!("   GET  /api/rfp/:id - Obtener RFP");
    info!("   POST /api/rfp/:id/lanes - Agregar lane");
    info!("   PUT  /api/rfp/:id/lanes/:lane_id - Editar lane");
    info!("   DELETE /api/rfp/:id/lanes/:lane_id - Eliminar lane");
    info!("   GET  /api/rfp/:id/lanes/:lane_id/rate-check - Chequeo de tarifa alta");
    info!("   POST /api/rfp/:id/pre-solve - Previsualizar soluciones");
    info!("   POST /api/rfp/:id/apply-solutions - Aplicar soluciones");
    info!("   POST /api/rfp/:id/scenario - Aplicar escenario en lote");
    info!("   GET  /api/rfp/:id/stats - Estadísticas");
    info!("   GET  /api/rfp/:id/preflight - Chequeos previos al envío");
    info!("   POST /api/rfp/:id/submit - Enviar RFP");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
