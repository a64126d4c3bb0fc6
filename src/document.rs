//! The open document: current image, snapshot history, and the undo cursor.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::command::EditCommand;
use crate::error::EditError;
use crate::io;
use crate::settings;

/// An immutable capture of the image at one point in the edit history.
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    fn of(image: &RgbaImage) -> Self {
        Self {
            pixels: image.clone(),
        }
    }

    pub fn memory_bytes(&self) -> usize {
        self.pixels.width() as usize * self.pixels.height() as usize * 4
    }
}

/// A single open image plus its linear undo/redo history.
///
/// Invariant: whenever an image is loaded, `history[history_index]` holds
/// exactly the current image's pixels; undo and redo only move the cursor
/// and restore from the matching snapshot. Full snapshots (not diffs) keep
/// every restore O(1); documents are single small rasters, so the memory
/// cost is accepted, and the entry count is capped.
pub struct Document {
    path: Option<PathBuf>,
    image: Option<RgbaImage>,
    /// Set on every image replacement; consumed (and cleared) by the
    /// canvas view when it re-uploads the display texture.
    changed: bool,
    history: Vec<Snapshot>,
    history_index: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            path: None,
            image: None,
            changed: false,
            history: Vec::new(),
            history_index: 0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Decode `path` and make it the document's image, resetting history
    /// to a single entry at cursor 0.
    pub fn load(&mut self, path: &Path) -> Result<(), EditError> {
        let image = io::decode_image(path)?;
        self.path = Some(path.to_path_buf());
        self.install(image);
        Ok(())
    }

    /// Install a decoded image as the new document state.
    fn install(&mut self, image: RgbaImage) {
        self.history.clear();
        self.history.push(Snapshot::of(&image));
        self.history_index = 0;
        self.image = Some(image);
        self.changed = true;
    }

    /// Run one command against the current image. On success the result
    /// becomes the current image and, unless the command opted out, is
    /// committed to history. A failing command leaves image and history
    /// untouched.
    pub fn execute(&mut self, command: &EditCommand) -> Result<(), EditError> {
        let image = self.image.as_ref().ok_or(EditError::NoImage)?;
        let new_image = command.execute(image)?;
        self.image = Some(new_image);
        self.changed = true;
        if command.save_needed {
            self.commit();
        }
        Ok(())
    }

    /// Append a snapshot of the current image after the cursor, discarding
    /// any entries beyond it first. Redoing into the discarded branch is
    /// impossible once a new edit is committed.
    fn commit(&mut self) {
        let image = match &self.image {
            Some(image) => image,
            None => return,
        };
        self.history.truncate(self.history_index + 1);
        self.history.push(Snapshot::of(image));
        self.history_index += 1;

        // Bounded history: drop the oldest entries past the cap.
        while self.history.len() > settings::MAX_HISTORY_ENTRIES {
            self.history.remove(0);
            self.history_index -= 1;
        }
    }

    /// Step the cursor back one entry. No-op at the first entry.
    pub fn undo(&mut self) {
        if self.history_index > 0 {
            self.history_index -= 1;
            self.restore_cursor();
        }
    }

    /// Step the cursor forward one entry. No-op at the last entry.
    pub fn redo(&mut self) {
        if self.history_index + 1 < self.history.len() {
            self.history_index += 1;
            self.restore_cursor();
        }
    }

    fn restore_cursor(&mut self) {
        if let Some(snapshot) = self.history.get(self.history_index) {
            self.image = Some(snapshot.pixels.clone());
            self.changed = true;
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history_index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.history.is_empty() && self.history_index + 1 < self.history.len()
    }

    /// Encode the current image to `path`.
    pub fn save(&self, path: &Path) -> Result<(), EditError> {
        let image = self.image.as_ref().ok_or(EditError::NoImage)?;
        io::encode_image(image, path)
    }

    /// Return and clear the changed flag. The renderer calls this once per
    /// tick and re-uploads the display texture when it reads true.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn cursor(&self) -> usize {
        self.history_index
    }

    pub fn history_memory_bytes(&self) -> usize {
        self.history.iter().map(Snapshot::memory_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use image::Rgba;

    fn loaded_document() -> Document {
        let mut doc = Document::new();
        let mut image = RgbaImage::new(8, 8);
        for (i, px) in image.pixels_mut().enumerate() {
            *px = Rgba([(i % 251) as u8, (i * 3 % 251) as u8, (i * 7 % 251) as u8, 255]);
        }
        doc.install(image);
        doc
    }

    fn raw(doc: &Document) -> Vec<u8> {
        doc.image().unwrap().as_raw().clone()
    }

    #[test]
    fn fresh_document_is_empty() {
        let doc = Document::new();
        assert!(!doc.is_loaded());
        assert_eq!(doc.history_len(), 0);
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
    }

    #[test]
    fn n_commands_give_n_plus_one_entries() {
        let mut doc = loaded_document();
        let n = 5;
        for _ in 0..n {
            doc.execute(&EditCommand::new(CommandKind::Invert)).unwrap();
        }
        assert_eq!(doc.cursor(), n);
        assert_eq!(doc.history_len(), n + 1);
    }

    #[test]
    fn undo_then_redo_restores_identical_pixels() {
        let mut doc = loaded_document();
        doc.execute(&EditCommand::new(CommandKind::Smooth)).unwrap();
        doc.execute(&EditCommand::new(CommandKind::Invert)).unwrap();
        let latest = raw(&doc);

        doc.undo();
        assert_ne!(raw(&doc), latest);
        doc.redo();
        assert_eq!(raw(&doc), latest);
    }

    #[test]
    fn commit_after_undo_discards_redo_branch() {
        let mut doc = loaded_document();
        for _ in 0..4 {
            doc.execute(&EditCommand::new(CommandKind::Invert)).unwrap();
        }
        assert_eq!(doc.history_len(), 5);
        assert_eq!(doc.cursor(), 4);

        doc.undo();
        doc.undo();
        assert_eq!(doc.cursor(), 2);

        doc.execute(&EditCommand::new(CommandKind::Emboss)).unwrap();
        assert_eq!(doc.history_len(), 4);
        assert_eq!(doc.cursor(), 3);
        assert!(!doc.can_redo());
    }

    #[test]
    fn undo_at_start_is_a_noop() {
        let mut doc = loaded_document();
        let before = raw(&doc);
        doc.undo();
        assert_eq!(doc.cursor(), 0);
        assert_eq!(raw(&doc), before);
    }

    #[test]
    fn redo_at_end_is_a_noop() {
        let mut doc = loaded_document();
        doc.execute(&EditCommand::new(CommandKind::Invert)).unwrap();
        let before = raw(&doc);
        doc.redo();
        assert_eq!(doc.cursor(), 1);
        assert_eq!(raw(&doc), before);
    }

    #[test]
    fn execute_without_image_fails_and_leaves_history_empty() {
        let mut doc = Document::new();
        let result = doc.execute(&EditCommand::new(CommandKind::Invert));
        assert!(matches!(result, Err(EditError::NoImage)));
        assert_eq!(doc.history_len(), 0);
        assert!(!doc.is_loaded());
    }

    #[test]
    fn failing_command_leaves_state_untouched() {
        let mut doc = loaded_document();
        let before = raw(&doc);
        // Resize with no assigned data must fail without side effects.
        let result = doc.execute(&EditCommand::new(CommandKind::Resize));
        assert!(matches!(result, Err(EditError::InvalidParameter(_))));
        assert_eq!(raw(&doc), before);
        assert_eq!(doc.history_len(), 1);
        assert_eq!(doc.cursor(), 0);
    }

    #[test]
    fn transient_command_skips_history() {
        let mut doc = loaded_document();
        doc.execute(&EditCommand::transient(CommandKind::Invert))
            .unwrap();
        assert_eq!(doc.history_len(), 1);
        assert_eq!(doc.cursor(), 0);
        // The image itself did change.
        assert!(doc.take_changed());
    }

    #[test]
    fn take_changed_clears_the_flag() {
        let mut doc = loaded_document();
        assert!(doc.take_changed());
        assert!(!doc.take_changed());
        doc.execute(&EditCommand::new(CommandKind::Invert)).unwrap();
        assert!(doc.take_changed());
        assert!(!doc.take_changed());
    }

    #[test]
    fn history_is_bounded() {
        let mut doc = loaded_document();
        for _ in 0..(settings::MAX_HISTORY_ENTRIES + 10) {
            doc.execute(&EditCommand::new(CommandKind::Invert)).unwrap();
        }
        assert_eq!(doc.history_len(), settings::MAX_HISTORY_ENTRIES);
        assert_eq!(doc.cursor(), settings::MAX_HISTORY_ENTRIES - 1);
        // The cursor still matches the live image.
        let before = raw(&doc);
        doc.undo();
        doc.redo();
        assert_eq!(raw(&doc), before);
    }
}
