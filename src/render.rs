//! Canvas2D drawing
//!
//! A thin I/O wrapper over the simulated state: nothing here mutates the
//! simulation, and nothing in `sim` knows this module exists.

use web_sys::CanvasRenderingContext2d;

use crate::consts::*;
use crate::sim::{Coin, Enemy, GamePhase, GameState, Player};

/// Lane marker geometry
const DASH_W: f64 = 6.0;
const DASH_H: f64 = 25.0;
const DASH_GAP: f64 = 40.0;

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Draw one frame of the current state
    pub fn draw(&self, state: &GameState) {
        let w = f64::from(CANVAS_W);
        let h = f64::from(CANVAS_H);

        self.ctx.set_fill_style_str("#0b1020");
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.draw_road(state.road_offset);

        // Darken the scene while paused or after a crash
        let session_over = state.phase == GamePhase::Ended;
        if state.phase == GamePhase::Paused || session_over {
            self.ctx.set_fill_style_str("rgba(0,0,0,.45)");
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }

        self.draw_player(&state.player);
        for enemy in &state.enemies {
            self.draw_enemy(enemy);
        }
        for coin in &state.coins {
            self.draw_coin(coin);
        }

        if session_over {
            self.ctx.set_fill_style_str("#fff");
            self.ctx.set_text_align("center");
            self.ctx.set_font("32px system-ui");
            let _ = self.ctx.fill_text("Game Over", w / 2.0, 320.0);
            self.ctx.set_font("18px system-ui");
            let final_score = format!("Final Score: {}", state.displayed_score());
            let _ = self.ctx.fill_text(&final_score, w / 2.0, 360.0);
            self.ctx.set_text_align("left");
        }

        if state.phase == GamePhase::Paused {
            self.ctx.set_fill_style_str("#fff");
            self.ctx.set_text_align("center");
            self.ctx.set_font("28px system-ui");
            let _ = self.ctx.fill_text("Paused", w / 2.0, 320.0);
            self.ctx.set_text_align("left");
        }
    }

    fn draw_road(&self, offset: f32) {
        let h = f64::from(CANVAS_H);
        let road_x = f64::from(ROAD_X);
        let road_w = f64::from(ROAD_W);

        // Side grass
        self.ctx.set_fill_style_str("#0f1b3a");
        self.ctx.fill_rect(0.0, 0.0, road_x, h);
        self.ctx.fill_rect(
            road_x + road_w,
            0.0,
            f64::from(CANVAS_W) - (road_x + road_w),
            h,
        );

        // Road surface with a slight sheen down the middle
        let grad = self
            .ctx
            .create_linear_gradient(road_x, 0.0, road_x + road_w, 0.0);
        let _ = grad.add_color_stop(0.0, "#1c1c1c");
        let _ = grad.add_color_stop(0.5, "#2a2a2a");
        let _ = grad.add_color_stop(1.0, "#1c1c1c");
        self.ctx.set_fill_style_canvas_gradient(&grad);
        self.ctx.fill_rect(road_x, 0.0, road_w, h);

        // Glowing side lines
        self.ctx.set_stroke_style_str("#ffcc00");
        self.ctx.set_line_width(4.0);
        self.ctx.stroke_rect(road_x, 0.0, road_w, h);

        // Scrolling lane dashes
        self.ctx.set_fill_style_str("rgba(255,255,255,.7)");
        for lane in 1..=3 {
            let lx = road_x + (road_w / 4.0) * f64::from(lane);
            let mut y = -DASH_H;
            while y < h + DASH_H {
                self.ctx
                    .fill_rect(lx - DASH_W / 2.0, y + f64::from(offset), DASH_W, DASH_H);
                y += DASH_GAP + DASH_H;
            }
        }
    }

    fn draw_player(&self, player: &Player) {
        self.draw_car(
            f64::from(player.pos.x),
            f64::from(player.pos.y),
            f64::from(PLAYER_W),
            f64::from(PLAYER_H),
            "#40c057",
            true,
        );
    }

    fn draw_enemy(&self, enemy: &Enemy) {
        self.draw_car(
            f64::from(enemy.pos.x),
            f64::from(enemy.pos.y),
            f64::from(ENEMY_W),
            f64::from(ENEMY_H),
            enemy.color.as_css(),
            false,
        );
    }

    fn draw_car(&self, x: f64, y: f64, w: f64, h: f64, color: &str, headlights: bool) {
        // Body
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);

        // Windshield
        self.ctx.set_fill_style_str("rgba(255,255,255,.35)");
        self.ctx.fill_rect(x + 10.0, y + 10.0, w - 20.0, 25.0);

        // Wheels
        self.ctx.set_fill_style_str("#111");
        self.ctx.fill_rect(x - 4.0, y + 15.0, 6.0, 20.0);
        self.ctx.fill_rect(x + w - 2.0, y + 15.0, 6.0, 20.0);
        self.ctx.fill_rect(x - 4.0, y + h - 35.0, 6.0, 20.0);
        self.ctx.fill_rect(x + w - 2.0, y + h - 35.0, 6.0, 20.0);

        if headlights {
            self.ctx.set_fill_style_str("yellow");
            self.ctx.fill_rect(x + 10.0, y - 5.0, 8.0, 8.0);
            self.ctx.fill_rect(x + w - 18.0, y - 5.0, 8.0, 8.0);
        }
    }

    fn draw_coin(&self, coin: &Coin) {
        let r = f64::from(COIN_SIZE) / 2.0;
        let cx = f64::from(coin.pos.x) + r;
        let cy = f64::from(coin.pos.y) + r;

        self.ctx.set_fill_style_str("gold");
        self.ctx.begin_path();
        let _ = self.ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU);
        self.ctx.fill();

        self.ctx.set_fill_style_str("rgba(255,255,255,.75)");
        self.ctx.begin_path();
        let _ = self.ctx.arc(cx, cy, r * 0.4, 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }
}
