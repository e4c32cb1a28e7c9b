//! Canvas 2D rendering module
//!
//! Draws the board with flat rectangles and circles. Reads the game state and
//! never mutates it.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{BrickState, GamePhase, GameState, PickupKind, Victory};

/// Brick colors from the bottom row up
pub const ROW_COLORS: [&str; BRICK_ROWS] = ["#f00", "#fa0", "#ff0", "#0f0", "#0ff"];

const BACKGROUND: &str = "#111";
const HEADER: &str = "#222";
const BALL: &str = "#fff";
const PADDLE: &str = "#0095dd";
const WIDE_PADDLE: &str = "#3cf";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Draw one frame. `time` is the animation frame timestamp in ms.
    pub fn render(&self, state: &GameState, settings: &Settings, time: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);

        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.scale(w / BOARD_WIDTH as f64, h / BOARD_HEIGHT as f64)?;

        ctx.save();
        if settings.effective_screen_shake() && state.shake.active() {
            // Pseudo-random jitter from the frame time keeps rendering stateless
            let i = state.shake.intensity as f64;
            let t = time * 0.05;
            ctx.translate((t * 12.9898).sin() * i, (t * 78.233).sin() * i)?;
        }

        self.draw_bricks(state);
        self.draw_pickups(state);
        self.draw_paddle(state);
        self.draw_balls(state)?;
        if settings.effective_score_popups() {
            self.draw_popups(state)?;
        }
        ctx.restore();

        self.draw_header(state)?;
        self.draw_banner(state)?;
        Ok(())
    }

    fn draw_bricks(&self, state: &GameState) {
        let ctx = &self.ctx;
        for cell in state.grid.iter() {
            let color = ROW_COLORS[BRICK_ROWS - 1 - cell.row];
            let pos = cell.draw_pos();
            match cell.state {
                BrickState::Empty => continue,
                BrickState::Active => ctx.set_fill_style_str(color),
                BrickState::Flashing { .. } => ctx.set_fill_style_str("#fff"),
                BrickState::Falling { opacity, .. } => {
                    ctx.set_global_alpha(opacity.clamp(0.0, 1.0) as f64);
                    ctx.set_fill_style_str(color);
                }
            }
            ctx.fill_rect(pos.x as f64, pos.y as f64, BRICK_WIDTH as f64, BRICK_HEIGHT as f64);
            ctx.set_global_alpha(1.0);
        }
    }

    fn draw_pickups(&self, state: &GameState) {
        let ctx = &self.ctx;
        for pickup in &state.pickups {
            let bounds = pickup.bounds();
            let size = bounds.size();
            ctx.set_fill_style_str(match pickup.kind {
                PickupKind::WidenPaddle => "#0f0",
                PickupKind::MultiBall => "#f0f",
            });
            ctx.fill_rect(
                bounds.min.x as f64,
                bounds.min.y as f64,
                size.x as f64,
                size.y as f64,
            );
        }
    }

    fn draw_paddle(&self, state: &GameState) {
        let paddle = &state.paddle;
        self.ctx.set_fill_style_str(if paddle.widen.is_some() {
            WIDE_PADDLE
        } else {
            PADDLE
        });
        self.ctx.fill_rect(
            paddle.x as f64,
            PADDLE_Y as f64,
            paddle.width as f64,
            PADDLE_HEIGHT as f64,
        );
    }

    fn draw_balls(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(BALL);
        for ball in &state.balls {
            ctx.begin_path();
            ctx.arc(
                ball.pos.x as f64,
                ball.pos.y as f64,
                ball.radius as f64,
                0.0,
                std::f64::consts::TAU,
            )?;
            ctx.fill();
        }
        Ok(())
    }

    fn draw_popups(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_font("bold 14px sans-serif");
        ctx.set_text_align("center");
        ctx.set_fill_style_str("#ff0");
        for popup in &state.popups {
            ctx.set_global_alpha(popup.opacity.clamp(0.0, 1.0) as f64);
            ctx.fill_text(&popup.text(), popup.pos.x as f64, popup.pos.y as f64)?;
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_header(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(HEADER);
        ctx.fill_rect(0.0, 0.0, BOARD_WIDTH as f64, HEADER_HEIGHT as f64);

        ctx.set_font("16px sans-serif");
        ctx.set_fill_style_str("#fff");
        ctx.set_text_align("left");
        ctx.fill_text(&format!("Score: {}", state.score), 8.0, 26.0)?;
        ctx.set_text_align("center");
        ctx.fill_text(&format!("x{}", state.multiplier), BOARD_WIDTH as f64 / 2.0, 26.0)?;
        ctx.set_text_align("right");
        ctx.fill_text(
            &format!("Best: {}", state.highscore.max(state.score)),
            BOARD_WIDTH as f64 - 8.0,
            26.0,
        )?;
        Ok(())
    }

    fn draw_banner(&self, state: &GameState) -> Result<(), JsValue> {
        let text = match (&state.phase, state.pending_level()) {
            (GamePhase::Playing, _) => return Ok(()),
            (_, Some(level)) => format!("Loading {}...", level),
            (GamePhase::Won(Victory::CampaignComplete), _) => {
                "You win! Press Space to play again".to_string()
            }
            (GamePhase::Won(Victory::CustomLevelComplete), _) => {
                "Level complete! Press Space".to_string()
            }
            (GamePhase::Lost, _) => "Game over. Press Space to restart".to_string(),
            (GamePhase::Loading { .. } | GamePhase::Transitioning { .. }, None) => {
                "Loading...".to_string()
            }
        };
        let ctx = &self.ctx;
        ctx.set_font("20px sans-serif");
        ctx.set_text_align("center");
        ctx.set_fill_style_str("#fff");
        ctx.fill_text(&text, BOARD_WIDTH as f64 / 2.0, BOARD_HEIGHT as f64 / 2.0 + 60.0)
    }
}
