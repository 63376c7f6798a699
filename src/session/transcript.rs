/// Append-only sequence of recognized text fragments
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    fragments: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Fragments joined in arrival order, without separators
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
