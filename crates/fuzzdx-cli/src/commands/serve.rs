use crate::support::{exit_with, load_engine_or_exit};
use fuzzdx_screen::Screener;
use fuzzdx_ux::ScreeningService;
use fuzzdx_ux::http::{HttpServerConfig, serve_screening_api};
use std::net::SocketAddr;

pub fn run(bind: String, config: Option<String>) {
    let bind_addr: SocketAddr = bind
        .parse()
        .unwrap_or_else(|e| exit_with(format!("invalid --bind address `{bind}`: {e}")));

    let loaded = load_engine_or_exit(config.as_deref());
    let name = loaded.spec.name.clone();
    let service = ScreeningService::new(loaded.spec, loaded.engine, Screener::default())
        .unwrap_or_else(|e| exit_with(e));

    println!("fuzzdx serve");
    println!("  bind: {bind_addr}");
    println!("  spec: {name} ({})", loaded.source);
    println!("  digest: {}", service.digest());
    println!("  routes:");
    println!("    GET /healthz");
    println!("    GET /config");
    println!("    GET /assess?AGE=<years>&<INDICATOR>=0|1...");

    if let Err(e) = serve_screening_api(HttpServerConfig::new(bind_addr), &service) {
        exit_with(format!("screening API failed: {e}"));
    }
}
