use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;

use chart3d_rs::api::{AnimationConfig, BarChart3D, ChartConfig, InteractionStrategyKind};
use chart3d_rs::core::{ChartType, DataSeries, ObjectId, PixelPoint, Viewport};
use chart3d_rs::interaction::{CornerIndex, MouseButton, RenderEvent};
use chart3d_rs::render::{HeadlessRenderer, HeadlessSurface, RenderSurface};

type LoopChart = BarChart3D<HeadlessRenderer, HeadlessSurface>;

fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(2));
    }
}

fn loop_config(fly_back_ms: u64) -> ChartConfig {
    let mut animation = AnimationConfig::default()
        .with_transition_steps(3)
        .with_fly_back_ms(fly_back_ms)
        .with_loop_sleep_ms(1);
    animation.fps_refresh_ms = 50;
    ChartConfig::default()
        .with_strategy(InteractionStrategyKind::ContinuousLoop)
        .with_animation(animation)
}

fn loop_chart(config: ChartConfig) -> LoopChart {
    let mut chart = BarChart3D::new(
        HeadlessRenderer::new(),
        HeadlessSurface::new(Viewport::new(800, 600)),
        config,
    )
    .expect("chart init");
    chart
        .build_scene(&[DataSeries::new(vec![10.0])], &["only"], &ChartType::default())
        .expect("build");
    wait_for("first frame", || {
        chart.with_renderer(|renderer| renderer.stats().full_frames >= 1)
    });
    chart
}

fn bar_pixel(chart: &LoopChart) -> PixelPoint {
    let centroid = Vec3::new(20.0, 7.5, 50.0);
    let pixel = chart
        .with_renderer(|renderer| renderer.project_to_pixel(centroid))
        .expect("bar in front of camera");
    PixelPoint::new(pixel.x as i32, pixel.y as i32)
}

#[test]
fn first_build_starts_exactly_one_loop() {
    let mut chart = loop_chart(loop_config(10_000));
    chart
        .build_scene(&[DataSeries::new(vec![3.0, 4.0])], &["a", "b"], &ChartType::default())
        .expect("rebuild");
    chart.update().expect("update is a no-op");

    assert_eq!(chart.worker_stats().launched, 1);
    wait_for("rebuilt scene rendered", || {
        chart.with_renderer(|renderer| renderer.stats().full_frames >= 2)
    });
}

#[test]
fn loop_keeps_rendering_while_idle() {
    let chart = loop_chart(loop_config(10_000));
    let swaps = chart.with_surface(|surface| surface.swap_count());
    wait_for("more frames", || {
        chart.with_surface(|surface| surface.swap_count()) > swaps + 5
    });
    assert_eq!(chart.pending_event(), RenderEvent::None);
}

#[test]
fn fps_overlay_is_refreshed() {
    let chart = loop_chart(loop_config(10_000));
    wait_for("fps label", || chart.fps_label().starts_with("Render FPS: "));
    wait_for("fps overlay drawn", || {
        chart.with_renderer(|renderer| {
            renderer
                .screen_texts()
                .iter()
                .any(|text| text.starts_with("Render FPS: "))
        })
    });
}

#[test]
fn click_selects_bar_then_walks_and_highlights() {
    let mut chart = loop_chart(loop_config(10_000));
    let pixel = bar_pixel(&chart);

    let selection = chart
        .click(pixel, MouseButton::Left)
        .expect("click")
        .expect("bar under cursor");
    assert_eq!(selection.id, ObjectId::new(1));

    let target = Vec3::new(20.0, 5.0, 340.0);
    wait_for("walk to bar", || chart.camera_pose().position == target);
    let pose = chart.camera_pose();
    assert_eq!(pose.direction, Vec3::new(20.0, 7.5, 100.0));
    assert!(pose.view_matrix().is_finite());
    wait_for("highlight", || {
        chart.with_renderer(|renderer| renderer.highlighted()) == Some(ObjectId::new(1))
    });
    wait_for("event slot cleared", || chart.pending_event().is_none());
    assert_eq!(chart.selected_bar(), Some(selection));
}

#[test]
fn click_on_empty_space_answers_none() {
    let mut chart = loop_chart(loop_config(10_000));
    let before = chart.camera_pose();
    let selection = chart
        .click(PixelPoint::new(0, 0), MouseButton::Left)
        .expect("click");
    assert!(selection.is_none());
    wait_for("event slot cleared", || chart.pending_event().is_none());
    assert_eq!(chart.camera_pose(), before);
}

#[test]
fn idle_chart_flies_back_to_default_after_timeout() {
    let mut chart = loop_chart(loop_config(40));
    let pixel = bar_pixel(&chart);
    chart
        .click(pixel, MouseButton::Left)
        .expect("click")
        .expect("bar under cursor");

    // The first walk step lands before the click is answered.
    let default = chart.default_camera_pose();
    assert!(!chart.camera_pose().same_placement(&default));
    wait_for("fly back", || chart.camera_pose().same_placement(&default));
    wait_for("highlight cleared", || {
        chart.with_renderer(|renderer| renderer.highlighted()).is_none()
    });
}

#[test]
fn drag_left_walks_to_next_corner() {
    let mut chart = loop_chart(loop_config(10_000));
    chart
        .drag_move(PixelPoint::new(300, 200), PixelPoint::new(250, 200), MouseButton::Left)
        .expect("drag");
    assert_eq!(chart.corner_index(), CornerIndex::new(1));

    let config = chart.config();
    let extents = chart.with_scene(|scene| scene.extents());
    let target = config
        .layout
        .placement()
        .corner_position(CornerIndex::new(1), extents);
    wait_for("walk to corner", || chart.camera_pose().position == target);
    assert_eq!(chart.camera_pose().direction, extents.center());
}

#[test]
fn vertical_drag_is_ignored() {
    let mut chart = loop_chart(loop_config(10_000));
    chart
        .drag_move(PixelPoint::new(300, 200), PixelPoint::new(300, 100), MouseButton::Left)
        .expect("drag");
    assert_eq!(chart.corner_index(), CornerIndex::default());
    assert_eq!(chart.pending_event(), RenderEvent::None);
}

#[test]
fn scroll_dollies_camera_and_loop_clears_event() {
    let mut chart = loop_chart(loop_config(10_000));
    let before = chart.camera_pose();
    let distance = before.position.distance(before.direction);

    chart.scroll(57).expect("scroll");
    let after = chart.camera_pose();
    assert!((after.position.distance(after.direction) - (distance - 5.0)).abs() < 1e-2);
    wait_for("scroll serviced", || chart.pending_event().is_none());
}

#[test]
fn scrolling_bars_configure_renderer() {
    let chart = loop_chart(loop_config(10_000).with_scroll_rate(Some(5)));
    chart.with_renderer(|renderer| {
        assert!(renderer.scroll_enabled());
        assert!((renderer.scroll_speed() - 7.0).abs() < 1e-5);
        assert!((renderer.scroll_distance() - 35.0).abs() < 1e-5);
    });
}

#[test]
fn click_without_running_loop_returns_none() {
    let mut chart = BarChart3D::new(
        HeadlessRenderer::new(),
        HeadlessSurface::new(Viewport::new(320, 240)),
        loop_config(10_000),
    )
    .expect("chart init");
    let selection = chart
        .click(PixelPoint::new(10, 10), MouseButton::Left)
        .expect("click");
    assert!(selection.is_none());
}

#[test]
fn dropping_chart_stops_the_loop() {
    let chart = loop_chart(loop_config(10_000));
    let started = Instant::now();
    drop(chart);
    assert!(started.elapsed() < Duration::from_secs(5));
}

/// Surface whose swap count and attach history outlive the chart.
struct SharedSurface {
    inner: HeadlessSurface,
    swaps: Arc<Mutex<usize>>,
    attach_calls: Arc<Mutex<Vec<bool>>>,
}

impl RenderSurface for SharedSurface {
    fn size_pixel(&self) -> Viewport {
        self.inner.size_pixel()
    }

    fn make_current(&mut self) {
        self.inner.make_current();
    }

    fn reset_current(&mut self) {
        self.inner.reset_current();
    }

    fn set_win_size(&mut self, size: Viewport) {
        self.inner.set_win_size(size);
    }

    fn swap_buffers(&mut self) {
        self.inner.swap_buffers();
        *self.swaps.lock().expect("swaps") += 1;
    }

    fn set_chart_attached(&mut self, attached: bool) {
        self.inner.set_chart_attached(attached);
        self.attach_calls.lock().expect("attach calls").push(attached);
    }
}

#[test]
fn destroyed_context_stops_frames_but_loop_keeps_serving() {
    let swaps = Arc::new(Mutex::new(0));
    let attach_calls = Arc::new(Mutex::new(Vec::new()));
    let surface = SharedSurface {
        inner: HeadlessSurface::new(Viewport::new(800, 600)),
        swaps: Arc::clone(&swaps),
        attach_calls: Arc::clone(&attach_calls),
    };
    let mut chart = BarChart3D::new(HeadlessRenderer::new(), surface, loop_config(10_000))
        .expect("chart init");
    chart
        .build_scene(&[DataSeries::new(vec![10.0])], &["only"], &ChartType::default())
        .expect("build");
    wait_for("first frames", || *swaps.lock().expect("swaps") >= 2);

    chart.context_destroyed();
    let frozen = *swaps.lock().expect("swaps");
    thread::sleep(Duration::from_millis(30));
    assert_eq!(*swaps.lock().expect("swaps"), frozen);

    let before = chart.camera_pose();
    chart
        .drag_move(PixelPoint::new(300, 200), PixelPoint::new(250, 200), MouseButton::Left)
        .expect("drag");
    wait_for("drag serviced", || chart.pending_event().is_none());
    wait_for("camera walked", || !chart.camera_pose().same_placement(&before));
    assert_eq!(*swaps.lock().expect("swaps"), frozen);

    let started = Instant::now();
    drop(chart);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(*attach_calls.lock().expect("attach calls"), vec![true]);
}
