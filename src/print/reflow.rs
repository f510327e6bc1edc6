//! Print-time reflow of the text container
//!
//! Wrap-to-window documents are rewrapped to the printed page for the duration
//! of a print job. The adapter captures the container size and wrap mode,
//! applies the temporary ones, and puts the originals back afterwards. At most
//! one reflow is outstanding per adapter.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{LayoutError, Result};
use crate::layout::{TextLayoutEngine, WrapMode};
use crate::Size;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Adapter lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflowState {
    Idle,
    Reflowed,
}

/// Container state captured by [`PrintReflowAdapter::begin_reflow`].
///
/// Not `Clone`: handing it back to `end_reflow` consumes it.
#[derive(Debug, PartialEq)]
#[must_use = "a reflow snapshot must be passed to end_reflow or discard"]
pub struct ReflowSnapshot {
    previous_size: Size,
    previous_wrap_mode: WrapMode,
    token: u64,
}

impl ReflowSnapshot {
    pub fn previous_size(&self) -> Size {
        self.previous_size
    }

    pub fn previous_wrap_mode(&self) -> WrapMode {
        self.previous_wrap_mode
    }
}

/// A snapshot the adapter refused, handed back to the caller
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct RejectedSnapshot {
    pub error: LayoutError,
    pub snapshot: ReflowSnapshot,
}

impl RejectedSnapshot {
    pub fn into_snapshot(self) -> ReflowSnapshot {
        self.snapshot
    }
}

impl From<RejectedSnapshot> for LayoutError {
    fn from(rejected: RejectedSnapshot) -> Self {
        rejected.error
    }
}

#[derive(Debug, Default)]
pub struct PrintReflowAdapter {
    /// Token of the outstanding snapshot
    outstanding: Option<u64>,
}

impl PrintReflowAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReflowState {
        if self.outstanding.is_some() {
            ReflowState::Reflowed
        } else {
            ReflowState::Idle
        }
    }

    /// Resize the container for printing and have the engine rebreak lines.
    ///
    /// Fails with `AlreadyReflowing` while another reflow is outstanding; the
    /// outstanding reflow and the container are left as they are.
    pub fn begin_reflow<E: TextLayoutEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        new_size: Size,
        wrap_mode: WrapMode,
    ) -> Result<ReflowSnapshot> {
        if self.outstanding.is_some() {
            log::error!("begin_reflow called while a reflow is outstanding");
            return Err(LayoutError::AlreadyReflowing);
        }

        let snapshot = ReflowSnapshot {
            previous_size: engine.container_size(),
            previous_wrap_mode: engine.wrap_mode(),
            token: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
        };
        engine.set_container_size(new_size);
        engine.set_wrap_mode(wrap_mode);
        engine.invalidate_layout();
        self.outstanding = Some(snapshot.token);

        log::debug!(
            "reflow to {}x{} ({:?}), was {}x{}",
            new_size.width,
            new_size.height,
            wrap_mode,
            snapshot.previous_size.width,
            snapshot.previous_size.height
        );
        Ok(snapshot)
    }

    /// Restore the size and wrap mode captured in `snapshot`.
    ///
    /// A snapshot that does not belong to this adapter's outstanding reflow is
    /// returned untouched inside the error, so its owner can still end it.
    pub fn end_reflow<E: TextLayoutEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        snapshot: ReflowSnapshot,
    ) -> std::result::Result<(), RejectedSnapshot> {
        let snapshot = self.release(snapshot)?;
        engine.set_container_size(snapshot.previous_size);
        engine.set_wrap_mode(snapshot.previous_wrap_mode);
        engine.invalidate_layout();
        log::debug!("reflow restored");
        Ok(())
    }

    /// Drop an outstanding snapshot without restoring the container
    pub fn discard(&mut self, snapshot: ReflowSnapshot) -> std::result::Result<(), RejectedSnapshot> {
        self.release(snapshot).map(drop)
    }

    fn release(
        &mut self,
        snapshot: ReflowSnapshot,
    ) -> std::result::Result<ReflowSnapshot, RejectedSnapshot> {
        let error = match self.outstanding {
            None => {
                log::error!("reflow snapshot returned while idle");
                LayoutError::NotReflowing
            }
            Some(token) if token != snapshot.token => {
                log::error!("reflow snapshot from another reflow");
                LayoutError::SnapshotMismatch
            }
            Some(_) => {
                self.outstanding = None;
                return Ok(snapshot);
            }
        };
        Err(RejectedSnapshot { error, snapshot })
    }

    /// Begin a reflow that ends when the returned session is finished or dropped
    pub fn session<'a, E: TextLayoutEngine + ?Sized>(
        &'a mut self,
        engine: &'a mut E,
        new_size: Size,
        wrap_mode: WrapMode,
    ) -> Result<ReflowSession<'a, E>> {
        let snapshot = self.begin_reflow(engine, new_size, wrap_mode)?;
        Ok(ReflowSession {
            adapter: self,
            engine,
            snapshot: Some(snapshot),
        })
    }

    /// Run `f` against the reflowed engine, restoring it whatever `f` returns
    pub fn with_reflow<E, R, F>(
        &mut self,
        engine: &mut E,
        new_size: Size,
        wrap_mode: WrapMode,
        f: F,
    ) -> Result<R>
    where
        E: TextLayoutEngine + ?Sized,
        F: FnOnce(&mut E) -> Result<R>,
    {
        let mut session = self.session(engine, new_size, wrap_mode)?;
        let result = f(session.engine());
        let restored = session.finish();
        let value = result?;
        restored?;
        Ok(value)
    }
}

/// An outstanding reflow bound to its engine; restores on drop
pub struct ReflowSession<'a, E: TextLayoutEngine + ?Sized> {
    adapter: &'a mut PrintReflowAdapter,
    engine: &'a mut E,
    snapshot: Option<ReflowSnapshot>,
}

impl<'a, E: TextLayoutEngine + ?Sized> ReflowSession<'a, E> {
    pub fn engine(&mut self) -> &mut E {
        &mut *self.engine
    }

    /// End the reflow now, reporting any restore error
    pub fn finish(mut self) -> Result<()> {
        match self.snapshot.take() {
            Some(snapshot) => Ok(self.adapter.end_reflow(&mut *self.engine, snapshot)?),
            None => Ok(()),
        }
    }
}

impl<'a, E: TextLayoutEngine + ?Sized> Drop for ReflowSession<'a, E> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            if let Err(err) = self.adapter.end_reflow(&mut *self.engine, snapshot) {
                log::error!("failed to restore reflowed container: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FontMetrics, PlainTextLayout};

    fn engine() -> PlainTextLayout {
        let mut engine = PlainTextLayout::new("Hello World", FontMetrics::monospace(8.0, 10.0));
        engine.set_container_size(Size::new(800.0, 1.0e7));
        engine
    }

    #[test]
    fn test_round_trip_restores_exactly() {
        let mut engine = engine();
        let mut adapter = PrintReflowAdapter::new();

        let snapshot = adapter
            .begin_reflow(&mut engine, Size::new(40.0, 1.0e7), WrapMode::WrapToPage)
            .unwrap();
        assert_eq!(adapter.state(), ReflowState::Reflowed);
        assert_eq!(engine.container_size(), Size::new(40.0, 1.0e7));
        assert_eq!(engine.wrap_mode(), WrapMode::WrapToPage);
        assert_eq!(snapshot.previous_size(), Size::new(800.0, 1.0e7));

        adapter.end_reflow(&mut engine, snapshot).unwrap();
        assert_eq!(adapter.state(), ReflowState::Idle);
        assert_eq!(engine.container_size(), Size::new(800.0, 1.0e7));
        assert_eq!(engine.wrap_mode(), WrapMode::WrapToWindow);
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let mut engine = engine();
        let mut adapter = PrintReflowAdapter::new();

        let first = adapter
            .begin_reflow(&mut engine, Size::new(40.0, 500.0), WrapMode::WrapToPage)
            .unwrap();
        let second = adapter.begin_reflow(&mut engine, Size::new(90.0, 90.0), WrapMode::WrapToWindow);
        assert!(matches!(second, Err(LayoutError::AlreadyReflowing)));

        // First reflow untouched
        assert_eq!(adapter.state(), ReflowState::Reflowed);
        assert_eq!(engine.container_size(), Size::new(40.0, 500.0));
        assert_eq!(engine.wrap_mode(), WrapMode::WrapToPage);

        adapter.end_reflow(&mut engine, first).unwrap();
        assert_eq!(engine.container_size(), Size::new(800.0, 1.0e7));
    }

    #[test]
    fn test_end_without_begin() {
        let mut engine = engine();
        let mut adapter = PrintReflowAdapter::new();
        let mut other = PrintReflowAdapter::new();

        let snapshot = other
            .begin_reflow(&mut engine, Size::new(40.0, 500.0), WrapMode::WrapToPage)
            .unwrap();
        let rejected = adapter.end_reflow(&mut engine, snapshot).unwrap_err();
        assert!(matches!(rejected.error, LayoutError::NotReflowing));

        // The owner can still end its reflow
        other.end_reflow(&mut engine, rejected.into_snapshot()).unwrap();
        assert_eq!(other.state(), ReflowState::Idle);
        assert_eq!(engine.container_size(), Size::new(800.0, 1.0e7));
    }

    #[test]
    fn test_foreign_snapshot_is_rejected() {
        let mut engine_a = engine();
        let mut engine_b = engine();
        let mut adapter_a = PrintReflowAdapter::new();
        let mut adapter_b = PrintReflowAdapter::new();

        let snap_a = adapter_a
            .begin_reflow(&mut engine_a, Size::new(40.0, 500.0), WrapMode::WrapToPage)
            .unwrap();
        let snap_b = adapter_b
            .begin_reflow(&mut engine_b, Size::new(40.0, 500.0), WrapMode::WrapToPage)
            .unwrap();

        let rejected = adapter_a.end_reflow(&mut engine_a, snap_b).unwrap_err();
        assert!(matches!(rejected.error, LayoutError::SnapshotMismatch));
        assert_eq!(adapter_a.state(), ReflowState::Reflowed);
        assert_eq!(engine_a.container_size(), Size::new(40.0, 500.0));
        adapter_a.end_reflow(&mut engine_a, snap_a).unwrap();

        // The rejected snapshot still releases its own adapter
        adapter_b
            .end_reflow(&mut engine_b, rejected.into_snapshot())
            .unwrap();
        assert_eq!(adapter_b.state(), ReflowState::Idle);
        assert_eq!(engine_b.container_size(), Size::new(800.0, 1.0e7));
        let again = adapter_b
            .begin_reflow(&mut engine_b, Size::new(40.0, 500.0), WrapMode::WrapToPage)
            .unwrap();
        adapter_b.end_reflow(&mut engine_b, again).unwrap();
    }

    #[test]
    fn test_discard_hands_back_foreign_snapshot() {
        let mut engine = engine();
        let mut adapter = PrintReflowAdapter::new();
        let mut owner = PrintReflowAdapter::new();
        let snapshot = owner
            .begin_reflow(&mut engine, Size::new(40.0, 500.0), WrapMode::WrapToPage)
            .unwrap();

        let rejected = adapter.discard(snapshot).unwrap_err();
        assert!(matches!(rejected.error, LayoutError::NotReflowing));
        owner.end_reflow(&mut engine, rejected.into_snapshot()).unwrap();
        assert_eq!(owner.state(), ReflowState::Idle);
    }

    #[test]
    fn test_discard_keeps_reflowed_size() {
        let mut engine = engine();
        let mut adapter = PrintReflowAdapter::new();
        let snapshot = adapter
            .begin_reflow(&mut engine, Size::new(40.0, 500.0), WrapMode::WrapToPage)
            .unwrap();
        adapter.discard(snapshot).unwrap();
        assert_eq!(adapter.state(), ReflowState::Idle);
        assert_eq!(engine.container_size(), Size::new(40.0, 500.0));
    }

    #[test]
    fn test_reflow_rebreaks_lines() {
        let mut engine = engine();
        let mut adapter = PrintReflowAdapter::new();
        let height = adapter
            .with_reflow(&mut engine, Size::new(40.0, 1.0e7), WrapMode::WrapToPage, |engine| {
                let width = engine.container_size().width;
                Ok(engine.used_height(width))
            })
            .unwrap();
        assert_eq!(height, 20.0);
        assert_eq!(engine.container_size().width, 800.0);
    }

    #[test]
    fn test_with_reflow_restores_on_error() {
        let mut engine = engine();
        let mut adapter = PrintReflowAdapter::new();
        let result: Result<()> = adapter.with_reflow(
            &mut engine,
            Size::new(40.0, 500.0),
            WrapMode::WrapToPage,
            |_| Err(LayoutError::DegenerateGeometry("cancelled".into())),
        );
        assert!(result.is_err());
        assert_eq!(adapter.state(), ReflowState::Idle);
        assert_eq!(engine.container_size(), Size::new(800.0, 1.0e7));
    }

    #[test]
    fn test_session_restores_on_panic() {
        let mut engine = engine();
        let mut adapter = PrintReflowAdapter::new();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _session = adapter
                .session(&mut engine, Size::new(40.0, 500.0), WrapMode::WrapToPage)
                .unwrap();
            panic!("print job crashed");
        }));
        assert!(outcome.is_err());
        assert_eq!(adapter.state(), ReflowState::Idle);
        assert_eq!(engine.container_size(), Size::new(800.0, 1.0e7));
        assert_eq!(engine.wrap_mode(), WrapMode::WrapToWindow);
    }
}
