use glam::{Mat4, Vec3};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{
    BarInformation, CategoryProvider, ChartType, DataSeries, FILL_COLOR_PROPERTY, IdAllocator,
    ObjectId, SceneExtents, bar_height, height_normalizer, max_series_value,
};
use crate::render::{
    BarShape, Color, LineShape, RectangleShape, Renderer, Shape, TextCache, TextShape,
    series_color,
};

use super::{Scene, SceneLayoutConfig};

/// Summary of one scene build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildReport {
    pub bar_count: usize,
    pub shape_count: usize,
    /// The default camera was placed by this build.
    pub first_build: bool,
    /// Divisor applied to values to get bar heights.
    pub normalizer: f64,
    pub next_id: ObjectId,
}

/// Turns data series and category labels into scene shapes.
pub struct SceneBuilder<'a> {
    layout: SceneLayoutConfig,
    scrolling_bars: bool,
    text_cache: &'a mut TextCache,
}

impl<'a> SceneBuilder<'a> {
    #[must_use]
    pub fn new(layout: SceneLayoutConfig, text_cache: &'a mut TextCache) -> Self {
        Self {
            layout,
            scrolling_bars: false,
            text_cache,
        }
    }

    /// Scrolling bars hide the last column behind the scene edge.
    #[must_use]
    pub fn with_scrolling_bars(mut self, scrolling_bars: bool) -> Self {
        self.scrolling_bars = scrolling_bars;
        self
    }

    /// Rebuilds `scene` from scratch.
    ///
    /// The live camera is only reset on the first build; later builds keep
    /// whatever pose the user navigated to.
    pub fn build<R, C>(
        &mut self,
        scene: &mut Scene,
        renderer: &mut R,
        series: &[DataSeries],
        categories: &C,
        chart_type: &ChartType,
    ) -> BuildReport
    where
        R: Renderer + ?Sized,
        C: CategoryProvider + ?Sized,
    {
        let layout = self.layout;
        let mut ids = IdAllocator::new(layout.first_id, layout.id_stride);

        renderer.release_shapes();
        scene.reset_contents();

        let normalizer = height_normalizer(max_series_value(series));
        let mut x_end = 0.0_f32;
        let mut y_pos = 0.0_f32;
        let mut max_point_count = 0_usize;

        for (series_index, data) in series.iter().enumerate() {
            y_pos = series_index as f32 * layout.pitch_y() + layout.bar_gap_y;
            let point_count = data.point_count();
            max_point_count = max_point_count.max(point_count);

            let name = data.label(chart_type.series_label_role()).to_owned();
            if !name.is_empty() {
                let shape = self.series_name_text(&name, y_pos);
                scene.push_shape(shape);
            }
            scene.push_series_name(name);

            let lane_color = series_color(series_index);
            let mapped_fill = data.has_property_mapping(FILL_COLOR_PROPERTY);
            for point_index in 0..point_count {
                let color = if mapped_fill {
                    Color::from_property_value(
                        data.value_by_property(point_index, FILL_COLOR_PROPERTY),
                    )
                    .unwrap_or(lane_color)
                } else {
                    lane_color
                };

                let value = data.y_value(point_index);
                let height = bar_height(value, normalizer);
                let x_pos = point_index as f32 * layout.pitch_x() + layout.bar_gap_x;
                let origin = Vec3::new(x_pos, y_pos, 0.0);
                let transform = Mat4::from_translation(origin)
                    * Mat4::from_scale(Vec3::new(layout.bar_size_x, layout.bar_size_y, height));

                let id = ids.next_id();
                scene.insert_bar(
                    id,
                    BarInformation::new(
                        Vec3::new(x_pos, y_pos, height),
                        value,
                        point_index,
                        series_index,
                    ),
                );
                scene.push_shape(Shape::Bar(BarShape {
                    transform,
                    color,
                    id,
                }));
            }

            x_end = x_end.max(point_count as f32 * layout.pitch_x());
        }

        y_pos += layout.pitch_y();

        let axis_end_x = if self.scrolling_bars {
            x_end - layout.bar_size_x
        } else {
            x_end
        };
        scene.push_shape(Shape::Line(LineShape {
            begin: Vec3::new(0.0, y_pos, 0.0),
            end: Vec3::new(axis_end_x, y_pos, 0.0),
            color: Color::BLUE,
            id: ids.next_id(),
        }));
        scene.push_shape(Shape::Line(LineShape {
            begin: Vec3::ZERO,
            end: Vec3::new(0.0, y_pos, 0.0),
            color: Color::BLUE,
            id: ids.next_id(),
        }));

        let rect_right = if self.scrolling_bars {
            x_end - layout.bar_size_x
        } else {
            x_end + 2.0 * layout.bar_gap_x
        };
        scene.push_shape(Shape::Rectangle(RectangleShape {
            top_left: Vec3::ZERO,
            top_right: Vec3::new(rect_right, 0.0, 0.0),
            bottom_right: Vec3::new(rect_right, y_pos, 0.0),
            fill_color: Color::BLACK,
            line_color: Color::BLUE,
            id: ids.next_id(),
        }));
        if self.scrolling_bars {
            renderer.set_scene_edge(layout.bar_gap_x - 0.001, rect_right - layout.bar_gap_x);
        } else {
            renderer.set_scene_edge(-0.001, rect_right);
        }

        let labels = categories.simple_categories();
        let shown = if self.scrolling_bars {
            labels.len().saturating_sub(1)
        } else {
            labels.len()
        };
        for (index, label) in labels.into_iter().take(shown).enumerate() {
            if !label.is_empty() {
                for shape in self.category_texts(&label, index, y_pos) {
                    scene.push_shape(shape);
                }
            }
            scene.push_category(label);
        }

        let first_build = self.place_camera(scene, max_point_count, series.len());
        scene.mark_full_render();

        let report = BuildReport {
            bar_count: scene.bars().len(),
            shape_count: scene.shapes().len(),
            first_build,
            normalizer,
            next_id: ids.peek(),
        };
        debug!(
            series = series.len(),
            bars = report.bar_count,
            shapes = report.shape_count,
            first_build,
            normalizer,
            "scene built"
        );
        report
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.layout.glyph_width
    }

    /// Series name left of its lane, reading along -X.
    fn series_name_text(&mut self, name: &str, y_pos: f32) -> Shape {
        let gap = self.layout.bar_gap_y;
        let top_right = Vec3::new(-gap, y_pos + gap, 0.0);
        let top_left = Vec3::new(-self.text_width(name) - gap, y_pos + gap, 0.0);
        let bottom_right = top_right - Vec3::new(0.0, self.layout.text_height, 0.0);
        Shape::Text(TextShape {
            label: name.to_owned(),
            bitmap: self.text_cache.get(name),
            top_left,
            top_right,
            bottom_right,
            id: ObjectId::NONE,
        })
    }

    /// One label behind the far axis and one in front of the near edge.
    fn category_texts(&mut self, label: &str, index: usize, y_pos: f32) -> SmallVec<[Shape; 2]> {
        let layout = self.layout;
        let x_pos = index as f32 * layout.pitch_x();
        let text_x = x_pos + layout.text_height + 0.5 * layout.bar_size_x;
        let width = self.text_width(label);
        let bitmap = self.text_cache.get(label);
        let far_y = y_pos + 0.5 * layout.bar_gap_y;
        let near_y = -width - 0.5 * layout.bar_gap_y;

        let mut shapes = SmallVec::new();
        shapes.push(Shape::Text(TextShape {
            label: label.to_owned(),
            bitmap: bitmap.clone(),
            top_left: Vec3::new(text_x, far_y + width, 0.0),
            top_right: Vec3::new(text_x, far_y, 0.0),
            bottom_right: Vec3::new(x_pos, far_y, 0.0),
            id: ObjectId::NONE,
        }));
        shapes.push(Shape::Text(TextShape {
            label: label.to_owned(),
            bitmap,
            top_left: Vec3::new(text_x, -0.5 * layout.bar_gap_y, 0.0),
            top_right: Vec3::new(text_x, near_y, 0.0),
            bottom_right: Vec3::new(x_pos, near_y, 0.0),
            id: ObjectId::NONE,
        }));
        shapes
    }

    fn place_camera(&self, scene: &mut Scene, max_point_count: usize, series_count: usize) -> bool {
        let layout = self.layout;
        let placement = layout.placement();
        let max_x = max_point_count as f32 * layout.pitch_x() + layout.extent_padding;
        let max_y = series_count as f32 * layout.pitch_y() + layout.extent_padding;

        if scene.camera_initialized() {
            let distance = scene.extents().distance;
            scene.set_extents(SceneExtents {
                max_x,
                max_y,
                distance,
            });
            return false;
        }

        let extents = SceneExtents {
            max_x,
            max_y,
            distance: placement.diagonal_distance(max_x, max_y),
        };
        let default_pose = placement.default_pose(extents);
        scene.set_default_camera(default_pose, extents);
        scene.set_camera_pose(default_pose);
        true
    }
}
