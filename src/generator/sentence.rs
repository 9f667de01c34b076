const SOURCE_TEXT: &str = "\
The harbor was quiet before the fishing boats came home. \
Gulls circled the masts and argued over scraps of bread. \
Nobody on the pier could remember a calmer evening. \
Have you ever watched the tide turn without noticing it? \
Old Marta mended nets on an upturned crate by the bait shop. \
Her fingers moved faster than her stories, and her stories were fast. \
A boy asked her how long it took to learn the knots. \
She laughed and told him it took exactly one lifetime! \
Down the street, the baker pulled the last loaves from the oven. \
The smell drifted over the water and reached the returning crews. \
Each captain tied up in the same place as the day before. \
Some habits are worth keeping for their own sake. \
When the lamps came on, the town looked like a small ship itself. \
Clouds gathered in the west, but no one hurried. \
Rain would come later, and the nets would dry tomorrow. \
Practice a little every day and the hands remember what the mind forgets. \
Slow and accurate typing becomes fast typing in time. \
Keep your eyes on the words, not on the keys. \
Breathe, relax your shoulders, and let each finger return home. \
One more line, then rest.";

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Walks a fixed text one sentence at a time. `None` bounds mean the cursor
/// sits at the start of the text.
#[derive(Clone, Debug)]
pub struct SentenceCursor {
    text: String,
    start: Option<usize>,
    end: Option<usize>,
}

impl SentenceCursor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            end: None,
        }
    }

    pub fn builtin() -> Self {
        Self::new(SOURCE_TEXT)
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
    }

    /// Byte range of the last returned chunk, before trimming.
    pub fn bounds(&self) -> (Option<usize>, Option<usize>) {
        (self.start, self.end)
    }

    /// Next sentence at or after the cursor, wrapping to the start of the
    /// text after the last one. Returns `None` only for text with no
    /// typeable content.
    pub fn next_sentence(&mut self) -> Option<String> {
        if self.text.trim().is_empty() {
            return None;
        }

        // Two passes over the text always reach a non-empty chunk.
        let mut budget = self.text.len() * 2;
        while budget > 0 {
            let mut from = self.end.unwrap_or(0);
            if from >= self.text.len() {
                from = 0;
            }
            let to = match self.text[from..].find(is_terminator) {
                Some(rel) => from + rel + 1,
                None => self.text.len(),
            };
            self.start = Some(from);
            self.end = Some(to);
            budget = budget.saturating_sub(to - from);

            let chunk = self.text[from..to]
                .trim_start_matches(|c: char| c.is_whitespace() || is_terminator(c))
                .trim_end();
            if !chunk.is_empty() {
                return Some(chunk.to_string());
            }
        }
        None
    }
}

impl Default for SentenceCursor {
    fn default() -> Self {
        Self::builtin()
    }
}
