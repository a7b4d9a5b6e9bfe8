use chart3d_rs::ChartError;
use chart3d_rs::api::{
    AnimationConfig, BarChart3D, ChartConfig, InteractionStrategyKind, SceneLayoutConfig,
};
use chart3d_rs::core::{ChartType, DataSeries, PixelPoint, Viewport};
use chart3d_rs::interaction::MouseButton;
use chart3d_rs::render::{HeadlessSurface, NullRenderer};

#[test]
fn chart_smoke_flow() {
    let config =
        ChartConfig::default().with_animation(AnimationConfig::default().with_transition_steps(4));
    let mut chart = BarChart3D::new(
        NullRenderer::default(),
        HeadlessSurface::new(Viewport::new(800, 600)),
        config,
    )
    .expect("chart init");

    let report = chart
        .build_scene(
            &[
                DataSeries::new(vec![12.0, 30.0, 18.0]).with_label("values-y", "2025"),
                DataSeries::new(vec![9.0, 21.0, 27.0]).with_label("values-y", "2026"),
            ],
            &["Jan", "Feb", "Mar"],
            &ChartType::default(),
        )
        .expect("build");
    assert_eq!(report.bar_count, 6);
    assert!(report.first_build);

    chart.update().expect("update");
    chart
        .drag_move(PixelPoint::new(100, 100), PixelPoint::new(60, 100), MouseButton::Left)
        .expect("drag");
    chart.scroll(30).expect("scroll");
    chart
        .click(PixelPoint::new(5, 5), MouseButton::Right)
        .expect("right click");
    chart.join_render_thread().expect("join");

    assert!(chart.camera_pose().same_placement(&chart.default_camera_pose()));
    assert_eq!(chart.worker_stats().peak_concurrent, 1);
    assert!(chart.with_surface(|surface| surface.swap_count()) > 0);
}

#[test]
fn empty_viewport_is_rejected() {
    let result = BarChart3D::new(
        NullRenderer::default(),
        HeadlessSurface::new(Viewport::new(0, 600)),
        ChartConfig::default(),
    );
    match result {
        Err(ChartError::InvalidViewport { width, height }) => {
            assert_eq!((width, height), (0, 600));
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("zero-width viewport accepted"),
    }
}

#[test]
fn invalid_config_is_rejected_before_attaching() {
    let config =
        ChartConfig::default().with_layout(SceneLayoutConfig::default().with_id_stride(1, 0));
    let result = BarChart3D::new(
        NullRenderer::default(),
        HeadlessSurface::new(Viewport::new(800, 600)),
        config,
    );
    assert!(matches!(result, Err(ChartError::InvalidConfig(_))));
}

#[test]
fn config_json_round_trip_keeps_strategy_and_scroll_rate() {
    let config = ChartConfig::default()
        .with_strategy(InteractionStrategyKind::ContinuousLoop)
        .with_scroll_rate(Some(4))
        .with_layout(SceneLayoutConfig::default().with_bar_size(20.0, 8.0));
    let json = config.to_json_pretty().expect("serialize");
    let restored = ChartConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored, config);
    assert!(restored.scrolling_bars());
}

#[test]
fn malformed_config_json_is_invalid_data() {
    let result = ChartConfig::from_json_str("{\"strategy\": \"Sometimes\"}");
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn telemetry_init_is_idempotent() {
    let _ = chart3d_rs::telemetry::init_default_tracing();
    assert!(!chart3d_rs::telemetry::init_default_tracing());
}
