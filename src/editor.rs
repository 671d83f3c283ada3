use crate::{
    configs::{default_for, LayerConfig, LayerField, LayerType},
    error::{BuilderError, Result},
};

/// The layer every new insertion starts from, wherever it lands.
pub const NEW_LAYER_TYPE: LayerType = LayerType::Conv2D;

/// Owns the ordered layer sequence under construction.
///
/// Sequence order is the network's forward order. All mutations go through
/// this type; validators and the assembler only ever borrow [`Self::layers`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerSequenceEditor {
    layers: Vec<LayerConfig>,
}

impl LayerSequenceEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_layers(layers: Vec<LayerConfig>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[LayerConfig] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LayerConfig> {
        self.layers.get(index)
    }

    /// Gives typed, in-place access to the layer at `index`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if there is no layer at `index`.
    pub fn layer_mut(&mut self, index: usize) -> Result<&mut LayerConfig> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(BuilderError::IndexOutOfRange { index, len })
    }

    /// Starts a build: an empty sequence receives its first default layer.
    /// A sequence that already has layers is left as is.
    pub fn start(&mut self) {
        if self.layers.is_empty() {
            self.layers.push(default_for(NEW_LAYER_TYPE));
            log::debug!("started a new build");
        }
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Inserts a default Conv2D layer right after `after`, or appends it when
    /// `after` is `None`.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `after` does not name an existing layer.
    pub fn insert(&mut self, after: Option<usize>) -> Result<()> {
        let at = match after {
            Some(index) => {
                self.check_index(index)?;
                index + 1
            }
            None => self.layers.len(),
        };

        self.layers.insert(at, default_for(NEW_LAYER_TYPE));
        log::debug!("inserted {NEW_LAYER_TYPE} at {at}");
        Ok(())
    }

    /// Removes the layer at `index`, keeping the others in order.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index` does not name an existing layer.
    pub fn remove(&mut self, index: usize) -> Result<LayerConfig> {
        self.check_index(index)?;
        let removed = self.layers.remove(index);
        log::debug!("removed {} at {index}", removed.layer_type());
        Ok(removed)
    }

    /// Replaces the layer at `index` with the default layer of `kind`.
    /// Nothing of the previous layer carries over, even when `kind` is unchanged.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index` does not name an existing layer.
    pub fn set_type(&mut self, index: usize, kind: LayerType) -> Result<()> {
        let layer = self.layer_mut(index)?;
        *layer = default_for(kind);
        log::debug!("layer {index} reset to {kind}");
        Ok(())
    }

    /// Writes a single field of the layer at `index`, leaving its other fields
    /// untouched.
    ///
    /// A field that the layer's kind does not have is ignored.
    ///
    /// # Returns
    /// Whether the field was written.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index` does not name an existing layer.
    pub fn set_field(&mut self, index: usize, field: LayerField) -> Result<bool> {
        let layer = self.layer_mut(index)?;
        let name = field.name();
        let kind = layer.layer_type();

        let applied = layer.apply(field);
        if applied {
            log::debug!("layer {index}: set {name}");
        } else {
            log::debug!("layer {index}: {kind} has no field {name}, ignored");
        }
        Ok(applied)
    }

    /// Same as [`Self::set_field`] for a boundary field name and raw JSON value.
    /// Unknown names and values of the wrong shape are ignored.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `index` does not name an existing layer.
    pub fn set_raw_field(
        &mut self,
        index: usize,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<bool> {
        self.check_index(index)?;
        match LayerField::from_raw(name, value) {
            Some(field) => self.set_field(index, field),
            None => {
                log::debug!("layer {index}: unrecognised or out-of-range field {name}={value}, ignored");
                Ok(false)
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.layers.len() {
            Ok(())
        } else {
            Err(BuilderError::IndexOutOfRange {
                index,
                len: self.layers.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::configs::{non_zero, Activation, DropoutRate};

    fn editor_with(kinds: &[LayerType]) -> LayerSequenceEditor {
        LayerSequenceEditor::from_layers(kinds.iter().map(|k| default_for(*k)).collect())
    }

    fn kinds(editor: &LayerSequenceEditor) -> Vec<LayerType> {
        editor.layers().iter().map(LayerConfig::layer_type).collect()
    }

    #[test]
    fn insert_none_appends_a_default_conv() {
        let mut editor = editor_with(&[LayerType::Flatten, LayerType::Dense]);
        editor.set_field(1, LayerField::Units(non_zero(7))).unwrap();
        let before = editor.layers().to_vec();

        editor.insert(None).unwrap();

        assert_eq!(editor.len(), 3);
        assert_eq!(&editor.layers()[..2], &before[..]);
        assert_eq!(editor.layers()[2], default_for(LayerType::Conv2D));
    }

    #[test]
    fn insert_after_index_lands_right_after_it() {
        let mut editor = editor_with(&[LayerType::Flatten, LayerType::Dense]);

        editor.insert(Some(0)).unwrap();

        assert_eq!(
            kinds(&editor),
            vec![LayerType::Flatten, LayerType::Conv2D, LayerType::Dense]
        );
    }

    #[test]
    fn insert_after_last_index_appends() {
        let mut editor = editor_with(&[LayerType::Flatten]);
        editor.insert(Some(0)).unwrap();
        assert_eq!(kinds(&editor), vec![LayerType::Flatten, LayerType::Conv2D]);
    }

    #[test]
    fn insert_out_of_range_is_rejected() {
        let mut editor = LayerSequenceEditor::new();
        let err = editor.insert(Some(0)).unwrap_err();

        assert!(matches!(
            err,
            BuilderError::IndexOutOfRange { index: 0, len: 0 }
        ));
        assert!(editor.is_empty());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut editor = editor_with(&[
            LayerType::Conv2D,
            LayerType::MaxPooling2D,
            LayerType::Flatten,
            LayerType::Dense,
        ]);

        let removed = editor.remove(1).unwrap();

        assert_eq!(removed.layer_type(), LayerType::MaxPooling2D);
        assert_eq!(
            kinds(&editor),
            vec![LayerType::Conv2D, LayerType::Flatten, LayerType::Dense]
        );
        assert!(matches!(
            editor.remove(3),
            Err(BuilderError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn set_type_discards_previous_fields() {
        let mut editor = editor_with(&[LayerType::Conv2D]);
        editor
            .set_field(0, LayerField::KernelSize("5x5".into()))
            .unwrap();

        editor.set_type(0, LayerType::Dense).unwrap();
        assert_eq!(editor.get(0), Some(&default_for(LayerType::Dense)));

        editor.set_type(0, LayerType::Conv2D).unwrap();
        assert_eq!(editor.get(0), Some(&default_for(LayerType::Conv2D)));
    }

    #[test]
    fn set_field_touches_only_that_field() {
        let mut editor = editor_with(&[LayerType::Conv2D]);

        assert!(editor.set_field(0, LayerField::Filters(non_zero(64))).unwrap());
        assert_eq!(
            editor.get(0),
            Some(&LayerConfig::Conv2D {
                filters: non_zero(64),
                kernel_size: "3x3".into(),
                strides: "1x1".into(),
                activation: Activation::Relu,
            })
        );
    }

    #[test]
    fn set_field_for_another_kind_is_inert() {
        let mut editor = editor_with(&[LayerType::Flatten]);

        let rate = LayerField::Rate(DropoutRate::DEFAULT);
        assert!(!editor.set_field(0, rate.clone()).unwrap());
        assert_eq!(editor.get(0), Some(&LayerConfig::Flatten));
        assert!(editor.set_field(1, rate).is_err());
    }

    #[test]
    fn set_raw_field_maps_boundary_names() {
        let mut editor = editor_with(&[LayerType::Dropout]);

        assert!(editor.set_raw_field(0, "rate", &json!(0.25)).unwrap());
        assert!(!editor.set_raw_field(0, "momentum", &json!(0.9)).unwrap());
        assert_eq!(
            editor.get(0),
            Some(&LayerConfig::Dropout {
                rate: DropoutRate::new(0.25).unwrap(),
            })
        );
    }

    #[test]
    fn set_raw_field_ignores_out_of_range_values() {
        let mut editor = editor_with(&[LayerType::Dropout, LayerType::Dense]);
        let before = editor.layers().to_vec();

        assert!(!editor.set_raw_field(0, "rate", &json!(7.5)).unwrap());
        assert!(!editor.set_raw_field(0, "rate", &json!(0.0)).unwrap());
        assert!(!editor.set_raw_field(0, "rate", &json!(-0.5)).unwrap());
        assert!(!editor.set_raw_field(1, "units", &json!(0)).unwrap());
        assert_eq!(editor.layers(), &before[..]);

        assert!(editor.set_raw_field(0, "rate", &json!(1.0)).unwrap());
        assert!(editor.set_raw_field(1, "units", &json!(1)).unwrap());
    }

    #[test]
    fn start_only_seeds_an_empty_sequence() {
        let mut editor = LayerSequenceEditor::new();
        editor.start();
        editor.start();
        assert_eq!(kinds(&editor), vec![LayerType::Conv2D]);
    }
}
