// Figure painter - Lowers figures onto surface primitives
use crate::application::view::BoardCanvas;
use crate::domain::figure::Figure;
use crate::domain::person::DEFAULT_AVATAR;
use crate::domain::zone::{Rgb, ZoneType};
use crate::presentation::surface::{RenderSurface, TextAlign};

const SHADOW: Rgb = Rgb(0x1e, 0x29, 0x3b);
const NAME_COLOR: Rgb = Rgb(0xf1, 0xf5, 0xf9);
const MUTED: Rgb = Rgb(0x94, 0xa3, 0xb8);
const EMPTY_TITLE: &str = "🏃 No one is out and about yet...";
const EMPTY_HINT: &str = "Check in to put yourself on the board!";

const HEAD_RADIUS: f32 = 22.0;
const BADGE_RADIUS: f32 = 25.0;

pub struct CanvasPainter<S: RenderSurface> {
    surface: S,
}

impl<S: RenderSurface> CanvasPainter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    fn draw_zone_label(&mut self, zone: ZoneType, x: f32, y: f32) {
        let color = zone.color();
        self.surface
            .text(x - 20.0, y + 10.0, zone.icon(), None, TextAlign::Left);
        self.surface
            .text(x + 20.0, y + 5.0, &zone.label(), Some(color), TextAlign::Left);
        self.surface.line(x - 30.0, y + 25.0, x + 200.0, y + 25.0, color);
    }

    fn draw_badge(&mut self, count: usize, x: f32, y: f32, color: Rgb) {
        self.surface.circle(x, y, BADGE_RADIUS, color, true);
        self.surface
            .text(x, y, &count.to_string(), None, TextAlign::Center);
        self.surface
            .text(x, y + 40.0, "together!", Some(MUTED), TextAlign::Center);
    }

    fn draw_person(&mut self, figure: &Figure, time: f32) {
        let Figure::Person {
            name,
            glyph,
            x,
            y,
            color,
            phase,
            ..
        } = figure
        else {
            return;
        };
        let (x, color, phase) = (*x, *color, *phase);

        let bob = (time * 2.5 + phase).sin() * 2.0;
        let arm_swing = (time * 4.0 + phase).sin() * 0.3;
        let leg_swing = (time * 3.0 + phase).sin() * 0.15;
        let y = *y + bob;

        // Ground shadow, then limbs, then the head on top.
        self.surface.ellipse(x, y + 95.0, 15.0, 5.0, SHADOW);

        self.surface.line(x, y + 22.0, x, y + 55.0, color);
        self.surface.line(
            x,
            y + 55.0,
            x - 12.0 - leg_swing * 10.0,
            y + 90.0,
            color,
        );
        self.surface.line(
            x,
            y + 55.0,
            x + 12.0 + leg_swing * 10.0,
            y + 90.0,
            color,
        );
        self.surface.line(
            x,
            y + 30.0,
            x - 18.0 + arm_swing * 15.0,
            y + 50.0,
            color,
        );
        self.surface.line(
            x,
            y + 30.0,
            x + 18.0 - arm_swing * 15.0,
            y + 50.0,
            color,
        );

        self.surface.circle(x, y, HEAD_RADIUS, color, false);
        if !self.surface.avatar(x, y, glyph) {
            // Broken asset degrades to the default glyph, never to a hole.
            self.surface.avatar(x, y, DEFAULT_AVATAR);
        }
        self.surface
            .text(x, y + 110.0, name, Some(NAME_COLOR), TextAlign::Center);
    }
}

impl<S: RenderSurface> BoardCanvas for CanvasPainter<S> {
    fn draw(&mut self, figures: &[Figure], time: f32) {
        self.surface.clear();
        for figure in figures {
            match figure {
                Figure::ZoneLabel { zone, x, y } => self.draw_zone_label(*zone, *x, *y),
                Figure::ClusterBadge { count, x, y, color } => {
                    self.draw_badge(*count, *x, *y, *color)
                }
                Figure::Person { .. } => self.draw_person(figure, time),
            }
        }
        self.surface.present();
    }

    fn draw_empty(&mut self) {
        self.surface.clear();
        let (width, height) = self.surface.size();
        self.surface.text(
            width / 2.0,
            height / 2.0 - 20.0,
            EMPTY_TITLE,
            Some(MUTED),
            TextAlign::Center,
        );
        self.surface.text(
            width / 2.0,
            height / 2.0 + 20.0,
            EMPTY_HINT,
            Some(MUTED),
            TextAlign::Center,
        );
        self.surface.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::surface::recording::{Op, RecordingSurface};

    fn person_figure(glyph: &str) -> Figure {
        Figure::Person {
            name: "Ada".to_string(),
            glyph: glyph.to_string(),
            x: 80.0,
            y: 120.0,
            color: ZoneType::Pub.color(),
            phase: 0.0,
        }
    }

    #[test]
    fn test_frame_is_clear_draw_present() {
        let mut painter = CanvasPainter::new(RecordingSurface::default());
        painter.draw(&[person_figure("🦆")], 0.0);

        let ops = &painter.surface.ops;
        assert_eq!(ops.first(), Some(&Op::Clear));
        assert_eq!(ops.last(), Some(&Op::Present));
        assert!(ops.len() > 2);
    }

    #[test]
    fn test_empty_state_message() {
        let mut painter = CanvasPainter::new(RecordingSurface::default());
        painter.draw_empty();

        let texts: Vec<_> = painter
            .surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t) => Some(t.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec![EMPTY_TITLE.to_string(), EMPTY_HINT.to_string()]);
    }

    #[test]
    fn test_broken_avatar_falls_back_to_default() {
        let mut surface = RecordingSurface::default();
        surface.broken_glyphs.push("🦆".to_string());
        let mut painter = CanvasPainter::new(surface);
        painter.draw(&[person_figure("🦆")], 0.0);

        let avatars: Vec<_> = painter
            .surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Avatar(g) => Some(g.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(avatars, vec!["🦆".to_string(), DEFAULT_AVATAR.to_string()]);
    }

    #[test]
    fn test_stick_figure_limb_count() {
        let mut painter = CanvasPainter::new(RecordingSurface::default());
        painter.draw(&[person_figure("🦆")], 1.7);

        let lines = painter
            .surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Line(_)))
            .count();
        // Body, two legs, two arms.
        assert_eq!(lines, 5);
    }
}
