//! Performance benchmarks for the XWayland view core
//!
//! Measures dispatch cost of the hot paths: commits on mapped views and
//! full create/map/unmap/destroy cycles.

use axiom_xwayland::decoration::DecorationMode;
use axiom_xwayland::geometry::WireGeometry;
use axiom_xwayland::surface::SurfaceId;
use axiom_xwayland::{HeadlessSurfaceLayer, Server, SurfaceEvent, XwmConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn populated_server(views: u32) -> Server<HeadlessSurfaceLayer> {
    let mut server = Server::new(XwmConfig::default(), HeadlessSurfaceLayer::new());
    for index in 1..=views {
        let surface = SurfaceId(index);
        server.surfaces_mut().create_surface(
            surface,
            WireGeometry::truncate(0, 0, 640, 480),
            false,
            DecorationMode::All,
        );
        server.dispatch(SurfaceEvent::NewSurface {
            surface,
            override_redirect: false,
        });
        server.surfaces_mut().map_surface(surface);
        server.dispatch(SurfaceEvent::Map { surface });
    }
    server
}

/// Benchmark commit dispatch with different numbers of live views
fn bench_commit_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_dispatch");

    for view_count in [1u32, 10, 100].iter() {
        group.bench_function(format!("commit_with_{}_views", view_count), |b| {
            let mut server = populated_server(*view_count);
            let wl_surface = server
                .view_for_surface(SurfaceId(1))
                .and_then(|view| view.wl_surface())
                .unwrap();
            let mut size = 0u32;
            b.iter(|| {
                size = size.wrapping_add(1);
                server.surfaces_mut().commit(wl_surface, size, size);
                server.dispatch(black_box(SurfaceEvent::Commit {
                    surface: wl_surface,
                }));
            });
        });
    }

    group.finish();
}

/// Benchmark a full view lifecycle
fn bench_view_lifecycle(c: &mut Criterion) {
    c.bench_function("create_map_unmap_destroy", |b| {
        b.iter_batched(
            || populated_server(10),
            |mut server| {
                let surface = SurfaceId(1000);
                server.surfaces_mut().create_surface(
                    surface,
                    WireGeometry::default(),
                    false,
                    DecorationMode::NoTitle,
                );
                server.dispatch(SurfaceEvent::NewSurface {
                    surface,
                    override_redirect: false,
                });
                server.surfaces_mut().map_surface(surface);
                server.dispatch(SurfaceEvent::Map { surface });
                server.dispatch(SurfaceEvent::Unmap { surface });
                server.surfaces_mut().unmap_surface(surface);
                server.dispatch(SurfaceEvent::Destroy { surface });
                black_box(server.stats())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_commit_dispatch, bench_view_lifecycle);
criterion_main!(benches);
