/// The single shared document. Updates are full replacements: the last
/// writer wins, there is no merge.
#[derive(Default)]
pub struct DocumentState {
    content: String,
}

impl DocumentState {
    pub fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    pub fn set(&mut self, content: &str) {
        self.content = content.to_string();
    }

    pub fn get(&self) -> &str {
        &self.content
    }

    pub fn byte_len(&self) -> usize {
        self.content.len()
    }
}
