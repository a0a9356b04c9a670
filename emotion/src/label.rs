use std::fmt;

/// Emotional state of a dog, in the positional order of the model outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emotion {
    Angry,
    Happy,
    Relaxed,
    Sad,
}

impl Emotion {
    /// Every label, ordered by output index.
    pub const ALL: [Emotion; 4] = [Emotion::Angry, Emotion::Happy, Emotion::Relaxed, Emotion::Sad];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Angry => "Angry",
            Emotion::Happy => "Happy",
            Emotion::Relaxed => "Relaxed",
            Emotion::Sad => "Sad",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_follows_output_order() {
        for (ix, label) in Emotion::ALL.iter().enumerate() {
            assert_eq!(label.index(), ix);
        }
        assert_eq!(Emotion::COUNT, 4);
    }

    #[test]
    fn display_names() {
        let names: Vec<String> = Emotion::ALL.iter().map(|e| e.to_string()).collect();
        assert_eq!(names, ["Angry", "Happy", "Relaxed", "Sad"]);
    }
}
