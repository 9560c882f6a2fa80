#![forbid(unsafe_code)]

//! Garden session controller.
//!
//! [`GardenSession`] is a pure state machine: it consumes [`GardenMsg`]
//! values and answers with a [`GardenCmd`] describing the store work a host
//! should perform. Completions come back as messages, so the controller
//! never blocks and never touches the network itself.
//!
//! ```text
//! Loading ──Loaded──▶ Ready ──OpenDrawing──▶ Drawing ──Publish──▶ Publishing
//!                       ▲                       │  ▲                  │
//!                       └──────CancelDrawing────┘  └──Inserted(Err)───┤
//!                       ▲                                             │
//!                       └───────────────Inserted(Ok)──────────────────┘
//! ```

use std::time::Duration;

use bloom_canvas::{DrawingSurface, PointerInput, Rgba, SurfaceBounds};
use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{SessionError, StoreError};
use crate::flower::{Flower, FlowerId};

/// How long the success notice stays up.
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the initial collection fetch.
    Loading,
    Ready,
    /// A drawing surface is open and accepting strokes.
    Drawing,
    /// An insert is in flight for the open surface.
    Publishing,
}

/// Transient message shown over the garden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A flower was planted; hides once `remaining` runs out.
    Planted { remaining: Duration },
    /// The store refused the last publish. Stays until dismissed.
    PublishFailed(String),
}

/// Inputs to [`GardenSession::update`].
#[derive(Debug, Clone)]
pub enum GardenMsg {
    Loaded(Result<Vec<Flower>, StoreError>),
    OpenDrawing,
    /// Explicit cancel or a click outside the drawing modal.
    CancelDrawing,
    PointerDown(PointerInput, SurfaceBounds),
    PointerMove(PointerInput, SurfaceBounds),
    PointerUp,
    PointerLeave,
    ClearDrawing,
    SelectColor(Rgba),
    SelectWidth(u8),
    /// Commit the open drawing, stamped with the host clock.
    Publish { now: DateTime<Utc> },
    Inserted {
        flower: Flower,
        result: Result<(), StoreError>,
    },
    /// Host time advanced by the given amount.
    Tick(Duration),
    DismissNotice,
}

/// Store work requested by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum GardenCmd {
    None,
    /// Fetch the whole collection, answer with [`GardenMsg::Loaded`].
    LoadAll,
    /// Insert one record, answer with [`GardenMsg::Inserted`].
    Insert(Flower),
    Batch(Vec<GardenCmd>),
}

impl GardenCmd {
    /// Collapse a list of commands, dropping no-ops.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|cmd| !matches!(cmd, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Owns the collection, the open drawing surface and the publish protocol.
#[derive(Debug)]
pub struct GardenSession<R = SmallRng> {
    flowers: Vec<Flower>,
    phase: Phase,
    surface: Option<DrawingSurface>,
    notice: Option<Notice>,
    pending: Option<FlowerId>,
    rng: R,
}

impl GardenSession<SmallRng> {
    /// A session seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(SmallRng::from_os_rng())
    }
}

impl Default for GardenSession<SmallRng> {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl<R: Rng> GardenSession<R> {
    /// A session in [`Phase::Loading`] that draws ids and placements from `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            flowers: Vec::new(),
            phase: Phase::Loading,
            surface: None,
            notice: None,
            pending: None,
            rng,
        }
    }

    /// The command to run once on mount.
    #[must_use]
    pub fn init(&self) -> GardenCmd {
        GardenCmd::LoadAll
    }

    /// The collection in display order.
    #[must_use]
    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn surface(&self) -> Option<&DrawingSurface> {
        self.surface.as_ref()
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Id of the flower whose insert is still in flight.
    #[must_use]
    pub const fn pending(&self) -> Option<&FlowerId> {
        self.pending.as_ref()
    }

    /// Whether a publish would be accepted right now.
    #[must_use]
    pub fn can_publish(&self) -> bool {
        self.phase == Phase::Drawing
            && self.pending.is_none()
            && self.surface.as_ref().is_some_and(DrawingSurface::has_content)
    }

    pub fn update(&mut self, msg: GardenMsg) -> GardenCmd {
        match msg {
            GardenMsg::Loaded(result) => self.on_loaded(result),
            GardenMsg::OpenDrawing => self.open_drawing(),
            GardenMsg::CancelDrawing => self.cancel_drawing(),
            GardenMsg::PointerDown(input, bounds) => {
                if let Some(surface) = self.drawing_surface() {
                    surface.begin_stroke(&input, &bounds);
                }
                GardenCmd::None
            }
            GardenMsg::PointerMove(input, bounds) => {
                if let Some(surface) = self.drawing_surface() {
                    surface.continue_stroke(&input, &bounds);
                }
                GardenCmd::None
            }
            GardenMsg::PointerUp => {
                if let Some(surface) = self.drawing_surface() {
                    surface.end_stroke();
                }
                GardenCmd::None
            }
            GardenMsg::PointerLeave => {
                if let Some(surface) = self.drawing_surface() {
                    surface.pointer_leave();
                }
                GardenCmd::None
            }
            GardenMsg::ClearDrawing => {
                if let Some(surface) = self.drawing_surface() {
                    surface.clear();
                }
                GardenCmd::None
            }
            GardenMsg::SelectColor(color) => {
                if let Some(surface) = self.drawing_surface() {
                    if let Err(err) = surface.set_color(color) {
                        tracing::warn!(%err, "color selection rejected");
                    }
                }
                GardenCmd::None
            }
            GardenMsg::SelectWidth(width) => {
                if let Some(surface) = self.drawing_surface() {
                    if let Err(err) = surface.set_width(width) {
                        tracing::warn!(%err, "width selection rejected");
                    }
                }
                GardenCmd::None
            }
            GardenMsg::Publish { now } => self.publish(now),
            GardenMsg::Inserted { flower, result } => self.on_inserted(flower, result),
            GardenMsg::Tick(elapsed) => {
                self.tick(elapsed);
                GardenCmd::None
            }
            GardenMsg::DismissNotice => {
                self.notice = None;
                GardenCmd::None
            }
        }
    }

    /// The open surface, only while strokes are accepted.
    fn drawing_surface(&mut self) -> Option<&mut DrawingSurface> {
        if self.phase == Phase::Drawing {
            self.surface.as_mut()
        } else {
            None
        }
    }

    fn on_loaded(&mut self, result: Result<Vec<Flower>, StoreError>) -> GardenCmd {
        if self.phase != Phase::Loading {
            tracing::debug!(phase = ?self.phase, "ignoring late collection load");
            return GardenCmd::None;
        }
        match result {
            Ok(mut flowers) => {
                flowers.sort_by_key(|flower| flower.created_at);
                tracing::debug!(count = flowers.len(), "garden loaded");
                self.flowers = flowers;
            }
            Err(err) => {
                let err = SessionError::Load(err);
                tracing::warn!(%err, "garden starts empty");
                self.flowers.clear();
            }
        }
        self.phase = Phase::Ready;
        GardenCmd::None
    }

    fn open_drawing(&mut self) -> GardenCmd {
        if self.phase != Phase::Ready {
            tracing::debug!(phase = ?self.phase, "open drawing ignored");
            return GardenCmd::None;
        }
        if matches!(self.notice, Some(Notice::PublishFailed(_))) {
            self.notice = None;
        }
        self.surface = Some(DrawingSurface::new());
        self.phase = Phase::Drawing;
        tracing::debug!("drawing surface opened");
        GardenCmd::None
    }

    fn cancel_drawing(&mut self) -> GardenCmd {
        match self.phase {
            Phase::Drawing | Phase::Publishing => {
                if self.phase == Phase::Publishing {
                    tracing::debug!(pending = ?self.pending, "surface dropped with insert in flight");
                }
                self.surface = None;
                self.phase = Phase::Ready;
            }
            Phase::Loading | Phase::Ready => {}
        }
        GardenCmd::None
    }

    fn publish(&mut self, now: DateTime<Utc>) -> GardenCmd {
        if self.phase == Phase::Publishing || self.pending.is_some() {
            tracing::debug!("publish already in flight");
            return GardenCmd::None;
        }
        let Some(surface) = self.drawing_surface() else {
            tracing::warn!("publish ignored: no drawing surface is open");
            return GardenCmd::None;
        };
        let image = match surface.commit() {
            Ok(image) => image,
            Err(err) => {
                let err = SessionError::from(err);
                tracing::warn!(%err, "publish ignored");
                return GardenCmd::None;
            }
        };

        let flower = Flower::plant(&image, now, &mut self.rng);
        tracing::debug!(id = %flower.id, x = flower.x, y = flower.y, "publishing flower");
        self.pending = Some(flower.id.clone());
        self.phase = Phase::Publishing;
        GardenCmd::Insert(flower)
    }

    fn on_inserted(&mut self, flower: Flower, result: Result<(), StoreError>) -> GardenCmd {
        if self.pending.as_ref() == Some(&flower.id) {
            self.pending = None;
        } else {
            tracing::warn!(id = %flower.id, "insert result for an unknown publish");
        }
        let was_publishing = self.phase == Phase::Publishing;

        match result {
            Ok(()) => {
                tracing::info!(id = %flower.id, total = self.flowers.len() + 1, "flower planted");
                self.flowers.push(flower);
                if was_publishing {
                    self.surface = None;
                    self.phase = Phase::Ready;
                }
                self.notice = Some(Notice::Planted {
                    remaining: NOTICE_DURATION,
                });
            }
            Err(err) => {
                let err = SessionError::Publish(err);
                tracing::error!(id = %flower.id, %err, "publish failed");
                if was_publishing {
                    self.phase = if self.surface.is_some() {
                        Phase::Drawing
                    } else {
                        Phase::Ready
                    };
                }
                self.notice = Some(Notice::PublishFailed(err.to_string()));
            }
        }
        GardenCmd::None
    }

    fn tick(&mut self, elapsed: Duration) {
        if let Some(Notice::Planted { remaining }) = &mut self.notice {
            *remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                self.notice = None;
            }
        }
    }
}
