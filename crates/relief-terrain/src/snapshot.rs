//! Terrain snapshot lifecycle
//!
//! Exactly one snapshot is current. Each capture builds a replacement, makes
//! it current, and hands the superseded one back to the backend for release.
//! Draws borrow the current snapshot immutably while `advance` needs `&mut`,
//! so a retired snapshot can never be drawn.

use image::RgbImage;
use relief_core::Result;

use crate::generator::{HeightfieldGenerator, TerrainSurface};

/// Uploads terrain surfaces and frees what it uploaded
pub trait SnapshotBackend {
    /// Handles owned by one snapshot (e.g. GPU buffers and a texture bind group)
    type Resources;

    /// Upload mesh and texture of `surface` as one unit
    fn upload(&mut self, surface: &TerrainSurface) -> Result<Self::Resources>;

    /// Free resources previously returned by `upload`
    fn release(&mut self, resources: Self::Resources);
}

/// A surface together with its uploaded resources
#[derive(Debug)]
pub struct TerrainSnapshot<R> {
    /// Monotonic capture number, starting at 0
    pub serial: u64,
    pub surface: TerrainSurface,
    pub resources: R,
}

/// Lifecycle counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub created: u64,
    pub released: u64,
    pub live: u64,
    pub peak_live: u64,
}

/// Owns the current terrain snapshot and replaces it on every capture
pub struct TerrainResourceManager<B: SnapshotBackend> {
    generator: HeightfieldGenerator,
    backend: B,
    current: Option<TerrainSnapshot<B::Resources>>,
    stats: SnapshotStats,
    next_serial: u64,
}

impl<B: SnapshotBackend> TerrainResourceManager<B> {
    pub fn new(generator: HeightfieldGenerator, backend: B) -> Self {
        Self {
            generator,
            backend,
            current: None,
            stats: SnapshotStats::default(),
            next_serial: 0,
        }
    }

    /// Build a snapshot from `frame`, make it current and release the previous one.
    /// On failure the previous snapshot stays current.
    pub fn advance(
        &mut self,
        frame: &RgbImage,
        max_height: f32,
    ) -> Result<&TerrainSnapshot<B::Resources>> {
        let surface = self.generator.generate(frame, max_height)?;
        let resources = self.backend.upload(&surface)?;

        let serial = self.next_serial;
        self.next_serial += 1;
        self.stats.created += 1;
        self.stats.live += 1;
        self.stats.peak_live = self.stats.peak_live.max(self.stats.live);
        log::trace!(
            "Created terrain snapshot #{} ({} vertices)",
            serial,
            surface.mesh.vertex_count()
        );

        let snapshot = TerrainSnapshot {
            serial,
            surface,
            resources,
        };

        if let Some(previous) = self.current.take() {
            self.retire(previous);
        }

        Ok(&*self.current.insert(snapshot))
    }

    /// The snapshot to draw this tick, if any capture has succeeded yet
    pub fn current(&self) -> Option<&TerrainSnapshot<B::Resources>> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> SnapshotStats {
        self.stats
    }

    pub fn generator(&self) -> &HeightfieldGenerator {
        &self.generator
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Release the current snapshot. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(current) = self.current.take() {
            self.retire(current);
        }
        log::debug!(
            "Terrain snapshots: {} created, {} released, peak {} live",
            self.stats.created,
            self.stats.released,
            self.stats.peak_live
        );
    }

    fn retire(&mut self, snapshot: TerrainSnapshot<B::Resources>) {
        log::trace!("Releasing terrain snapshot #{}", snapshot.serial);
        self.backend.release(snapshot.resources);
        self.stats.released += 1;
        self.stats.live -= 1;
    }
}

impl<B: SnapshotBackend> Drop for TerrainResourceManager<B> {
    fn drop(&mut self) {
        if let Some(current) = self.current.take() {
            self.retire(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use relief_core::config::TerrainSettings;
    use relief_core::ReliefError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// What the counting backend hands out: the first texel and the vertex
    /// count, captured at upload time.
    #[derive(Debug, PartialEq)]
    struct Uploaded {
        id: u32,
        texel: [u8; 4],
        vertex_count: usize,
    }

    #[derive(Default)]
    struct Ledger {
        uploaded: u32,
        released: Vec<u32>,
        live: i64,
        peak: i64,
    }

    struct CountingBackend {
        ledger: Rc<RefCell<Ledger>>,
        fail_next: bool,
    }

    impl SnapshotBackend for CountingBackend {
        type Resources = Uploaded;

        fn upload(&mut self, surface: &TerrainSurface) -> Result<Uploaded> {
            if std::mem::take(&mut self.fail_next) {
                return Err(ReliefError::RenderError("out of memory".into()));
            }
            let mut ledger = self.ledger.borrow_mut();
            let id = ledger.uploaded;
            ledger.uploaded += 1;
            ledger.live += 1;
            ledger.peak = ledger.peak.max(ledger.live);
            Ok(Uploaded {
                id,
                texel: surface.image.get_pixel(0, 0).0,
                vertex_count: surface.mesh.vertex_count(),
            })
        }

        fn release(&mut self, resources: Uploaded) {
            let mut ledger = self.ledger.borrow_mut();
            ledger.released.push(resources.id);
            ledger.live -= 1;
        }
    }

    fn manager() -> (TerrainResourceManager<CountingBackend>, Rc<RefCell<Ledger>>) {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let settings = TerrainSettings {
            image_width: 4,
            image_height: 4,
            grid_x: 2,
            grid_z: 2,
            ..TerrainSettings::default()
        };
        let backend = CountingBackend {
            ledger: Rc::clone(&ledger),
            fail_next: false,
        };
        (
            TerrainResourceManager::new(HeightfieldGenerator::new(&settings), backend),
            ledger,
        )
    }

    fn frame(level: u8) -> RgbImage {
        RgbImage::from_pixel(4, 4, Rgb([level, level, level]))
    }

    #[test]
    fn starts_without_snapshot() {
        let (manager, _) = manager();
        assert!(manager.current().is_none());
        assert_eq!(manager.stats(), SnapshotStats::default());
    }

    #[test]
    fn every_creation_is_released_exactly_once() {
        let (mut manager, ledger) = manager();
        for tick in 0..50u8 {
            let snapshot = manager.advance(&frame(tick), 80.0).unwrap();
            assert_eq!(snapshot.serial, tick as u64);
            let stats = manager.stats();
            assert!(stats.live <= 2);
            assert_eq!(stats.live, 1);
        }
        manager.shutdown();

        let stats = manager.stats();
        assert_eq!(stats.created, 50);
        assert_eq!(stats.released, 50);
        assert_eq!(stats.live, 0);
        assert!(stats.peak_live <= 2);

        let ledger = ledger.borrow();
        assert_eq!(ledger.uploaded, 50);
        assert_eq!(ledger.released, (0..50).collect::<Vec<_>>());
        assert_eq!(ledger.live, 0);
        assert!(ledger.peak <= 2);
    }

    #[test]
    fn previous_snapshot_released_after_replacement_exists() {
        let (mut manager, ledger) = manager();
        manager.advance(&frame(10), 80.0).unwrap();
        assert!(ledger.borrow().released.is_empty());

        manager.advance(&frame(20), 80.0).unwrap();
        let ledger = ledger.borrow();
        assert_eq!(ledger.released, vec![0]);
        assert_eq!(ledger.peak, 2);
    }

    #[test]
    fn texture_and_mesh_come_from_same_surface() {
        let (mut manager, _) = manager();
        for level in [0u8, 128, 255] {
            let snapshot = manager.advance(&frame(level), 80.0).unwrap();
            assert_eq!(snapshot.resources.texel, snapshot.surface.image.get_pixel(0, 0).0);
            assert_eq!(snapshot.resources.vertex_count, snapshot.surface.mesh.vertex_count());
            assert_eq!(snapshot.resources.texel, [level, level, level, 255]);
        }
    }

    #[test]
    fn failed_upload_keeps_previous_snapshot() {
        let (mut manager, ledger) = manager();
        manager.advance(&frame(50), 80.0).unwrap();

        manager.backend.fail_next = true;
        assert!(manager.advance(&frame(60), 80.0).is_err());

        let current = manager.current().unwrap();
        assert_eq!(current.serial, 0);
        assert_eq!(current.resources.texel, [50, 50, 50, 255]);
        assert_eq!(manager.stats().created, 1);
        assert!(ledger.borrow().released.is_empty());
    }

    #[test]
    fn drop_releases_current_snapshot() {
        let (mut manager, ledger) = manager();
        manager.advance(&frame(1), 80.0).unwrap();
        manager.advance(&frame(2), 80.0).unwrap();
        drop(manager);

        let ledger = ledger.borrow();
        assert_eq!(ledger.released, vec![0, 1]);
        assert_eq!(ledger.live, 0);
    }

    #[test]
    fn shutdown_twice_is_harmless() {
        let (mut manager, ledger) = manager();
        manager.advance(&frame(1), 80.0).unwrap();
        manager.shutdown();
        manager.shutdown();
        drop(manager);
        assert_eq!(ledger.borrow().released, vec![0]);
    }
}
