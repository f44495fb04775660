//! Directions against a real OSRM server over the India northern-zone
//! extract. Needs docker and a few GB of disk for the first run.

mod fixtures;

use std::env;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use pathfinder_routing::osrm::{OsrmClient, OsrmConfig};
use pathfinder_routing::osrm_data::{GeofabrikRegion, OsrmDataset, OsrmDatasetConfig, lua_profile};
use pathfinder_routing::polyline;
use pathfinder_routing::resolver::RouteResolver;
use pathfinder_routing::route::{PointRole, RouteSource, TravelMode};
use pathfinder_routing::traits::{DirectionsProvider, ProviderRoute};

use fixtures::{CONNAUGHT_PLACE, INDIA_GATE};

fn osrm_container(
    mode: TravelMode,
) -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_root = env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data".to_string());
    let region = GeofabrikRegion::new("asia/india/northern-zone");
    let config = OsrmDatasetConfig::new(region, data_root, mode);
    let dataset = OsrmDataset::ensure(&config)
        .map_err(|err| TestcontainersError::other(format!("OSRM prep failed: {err}")))?;
    let container_name = format!("osrm-northern-zone-{}", lua_profile(mode));
    let osrm_file = format!(
        "/data/{}",
        dataset
            .osrm_base
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    );

    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(
            dataset.data_dir.to_string_lossy().to_string(),
            "/data",
        ))
        .with_cmd(vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            osrm_file,
        ])
        .with_container_name(container_name)
        .with_startup_timeout(std::time::Duration::from_secs(60))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

fn wait_for_route(client: &OsrmClient, mode: TravelMode) -> Option<ProviderRoute> {
    let start = std::time::Instant::now();
    while start.elapsed() < std::time::Duration::from_secs(15) {
        match client.directions(CONNAUGHT_PLACE.coords(), INDIA_GATE.coords(), mode) {
            Ok(route) => return Some(route),
            Err(err) => eprintln!("OSRM not ready: {err}"),
        }
        std::thread::sleep(std::time::Duration::from_millis(500));
    }
    None
}

#[test]
#[ignore = "requires docker and an OSRM extract"]
fn osrm_walking_route_resolves() {
    let (container, base_url) = osrm_container(TravelMode::Walking).expect("start OSRM container");
    let client = OsrmClient::new(OsrmConfig {
        base_url,
        timeout_secs: 10,
    })
    .expect("build OSRM client");

    let provided = wait_for_route(&client, TravelMode::Walking).expect("OSRM answers");
    assert!(provided.geometry.len() >= 2);
    assert!(provided.distance_m > 1000.0);
    assert!(!provided.steps.is_empty());

    let route = RouteResolver::new(&client).resolve(
        CONNAUGHT_PLACE.coords(),
        INDIA_GATE.coords(),
        TravelMode::Walking,
    );
    assert_eq!(route.source, RouteSource::Provider);
    assert_eq!(route.points.first().map(|p| p.role), Some(PointRole::Start));
    assert_eq!(route.points.last().map(|p| p.role), Some(PointRole::End));
    assert_eq!(
        polyline::decode(&route.polyline).expect("valid polyline").len(),
        route.points.len()
    );

    drop(container);
}

#[test]
fn unreachable_osrm_falls_back() {
    let client = OsrmClient::new(OsrmConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
    })
    .expect("build OSRM client");

    let err = client
        .directions(CONNAUGHT_PLACE.coords(), INDIA_GATE.coords(), TravelMode::Driving)
        .unwrap_err();
    assert!(err.is_transport());

    let route = RouteResolver::new(&client).resolve(
        CONNAUGHT_PLACE.coords(),
        INDIA_GATE.coords(),
        TravelMode::Driving,
    );
    assert_eq!(route.source, RouteSource::Synthetic);
    assert_eq!(route.points.len(), 2);
}
