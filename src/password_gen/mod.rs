use log::warn;
use rand::{seq::SliceRandom, Rng};

use crate::utils::constants::DEFAULT_PASSWORD_LENGTH;

const DIGIT_CHARS: &str = "0123456789";
const UPPERCASE_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";
const SYMBOL_CHARS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Which letter classes go into a generated password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    Upper,
    Lower,
    #[default]
    Mixed,
}

impl CaseMode {
    /// `u` selects uppercase only, `l` lowercase only; anything else is mixed.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "u" => CaseMode::Upper,
            "l" => CaseMode::Lower,
            _ => CaseMode::Mixed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PasswordGenerator {
    length: usize,
    case: CaseMode,
    include_symbols: bool,
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_PASSWORD_LENGTH,
            case: CaseMode::Mixed,
            include_symbols: true,
        }
    }
}

impl PasswordGenerator {
    pub fn new(length: usize, case: CaseMode, include_symbols: bool) -> Self {
        Self {
            length,
            case,
            include_symbols,
        }
    }

    /// Character classes in effect; the first one is always digits.
    fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec![DIGIT_CHARS];
        match self.case {
            CaseMode::Upper => classes.push(UPPERCASE_CHARS),
            CaseMode::Lower => classes.push(LOWERCASE_CHARS),
            CaseMode::Mixed => {
                classes.push(UPPERCASE_CHARS);
                classes.push(LOWERCASE_CHARS);
            }
        }
        if self.include_symbols {
            classes.push(SYMBOL_CHARS);
        }
        classes
    }

    /// Length of the generated password. Never below the number of classes,
    /// since every class contributes one seed character.
    pub fn effective_length(&self) -> usize {
        self.length.max(self.classes().len())
    }

    pub fn generate(&self) -> String {
        let classes = self.classes();
        let length = self.effective_length();
        if length != self.length {
            warn!(
                "requested length {} is below the {} required character classes, using {}",
                self.length,
                classes.len(),
                length
            );
        }

        let mut rng = rand::thread_rng();
        let pool: Vec<char> = classes.iter().flat_map(|class| class.chars()).collect();

        let mut password: Vec<char> = Vec::with_capacity(length);
        for class in &classes {
            let chars: Vec<char> = class.chars().collect();
            password.push(chars[rng.gen_range(0..chars.len())]);
        }
        while password.len() < length {
            password.push(pool[rng.gen_range(0..pool.len())]);
        }

        password.shuffle(&mut rng);
        password.into_iter().collect()
    }
}
