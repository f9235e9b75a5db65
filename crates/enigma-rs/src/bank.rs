//! Graded bank of worked riddle examples.
//!
//! Each [`Example`] is a worked (riddle, source paragraph, answer) triple the
//! prompt builder renders as few-shot context. Examples are graded 1–5:
//! tier 1 riddles name a single fact from the passage, tier 5 riddles
//! synthesize across paragraphs. The bank is configuration data — built once
//! at startup, read-only thereafter.

use crate::error::EnigmaError;

/// Lowest supported difficulty tier (trivial identification).
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest supported difficulty tier (cross-paragraph synthesis).
pub const MAX_DIFFICULTY: u8 = 5;

/// A worked riddle example used to few-shot-instruct the model.
#[derive(Debug)]
pub struct Example {
    /// Ordinal tier, 1–5.
    pub difficulty: u8,
    /// Short human label. Documentation only — never sent to the model's
    /// consumer.
    pub title: &'static str,
    /// The long-form descriptive riddle the model must imitate.
    pub riddle_text: &'static str,
    /// The textbook passage the riddle was derived from.
    pub source_paragraph: &'static str,
    /// The expected literal answer.
    pub answer: &'static str,
}

/// The built-in example table. Order matters only for reproducibility: the
/// exemplar ladder always picks the first entry at each tier.
static BUILTIN_EXAMPLES: &[Example] = &[
    Example {
        difficulty: 1,
        title: "Chlorophyll",
        riddle_text: "I am the painter of every meadow and the thief of red \
            and blue light. I live inside tiny green factories scattered \
            through my host's cells, and everything the sun sends me I hand \
            over as captured energy. Without me the passage you just read \
            would have no color at all. Name me.",
        source_paragraph: "Plants capture sunlight using a green pigment \
            called chlorophyll, which is found in the chloroplasts of plant \
            cells. Chlorophyll absorbs red and blue wavelengths of light \
            while reflecting green, which is why leaves appear green to our \
            eyes.",
        answer: "Chlorophyll",
    },
    Example {
        difficulty: 1,
        title: "The cell nucleus",
        riddle_text: "I sit behind my own wall inside a walled city. Every \
            instruction the city follows is stored in my archive, yet I \
            never leave my chamber to give an order. Point to me in the \
            paragraph.",
        source_paragraph: "The nucleus is often called the control center of \
            the cell. It is surrounded by its own membrane, the nuclear \
            envelope, and contains the cell's genetic material. Instructions \
            stored in the nucleus direct nearly all of the cell's \
            activities.",
        answer: "The nucleus",
    },
    Example {
        difficulty: 2,
        title: "Evaporation and condensation",
        riddle_text: "Twice in this passage I change my costume. First the \
            sun lifts me invisible into the air; later the cold gathers me \
            into grey fleets that sail above you. I am one substance playing \
            two scenes — name the journey I am on.",
        source_paragraph: "The sun heats water in oceans and lakes, causing \
            it to evaporate into water vapor. As the vapor rises and cools, \
            it condenses into tiny droplets that form clouds. This endless \
            circulation of water between the surface and the atmosphere is \
            called the water cycle.",
        answer: "The water cycle",
    },
    Example {
        difficulty: 3,
        title: "The photosynthesis equation",
        riddle_text: "Into my workshop come six parts of a gas you exhale \
            and six parts of the liquid you drink, and I will not start work \
            until the sun pays the bill. Out of my door leave a sugar and \
            the very gas that keeps you alive. What process runs my \
            workshop?",
        source_paragraph: "During photosynthesis, plants combine six \
            molecules of carbon dioxide with six molecules of water, using \
            energy absorbed from sunlight. The products of the reaction are \
            one molecule of glucose and six molecules of oxygen, which is \
            released into the atmosphere.",
        answer: "Photosynthesis",
    },
    Example {
        difficulty: 4,
        title: "Natural selection, unnamed",
        riddle_text: "The passage never speaks my name, yet I am its quiet \
            author. I decide which beetles outlive the winter and which \
            moths the birds never see, not by choosing, but by letting the \
            environment do the choosing for me. Generations later my \
            signature is written in the whole population. What principle am \
            I?",
        source_paragraph: "In a population of beetles, some individuals \
            carry a variation that lets them survive colder winters. These \
            individuals are more likely to live long enough to reproduce, \
            passing the variation to their offspring. Over many generations, \
            the variation becomes common throughout the population.",
        answer: "Natural selection",
    },
    Example {
        difficulty: 5,
        title: "Energy flow synthesis",
        riddle_text: "To find me you must walk through three paragraphs at \
            once. I am born where light becomes sugar, I travel each time \
            one living thing eats another, and I leak away as warmth at \
            every step until the decomposers spend my last coin. No single \
            sentence holds me — I am the thread that stitches the whole \
            chapter together. What am I describing?",
        source_paragraph: "Producers convert sunlight into chemical energy \
            through photosynthesis. That energy passes to herbivores that \
            eat the producers, and again to the predators that eat them, \
            with roughly ninety percent lost as heat at each transfer. \
            Decomposers finally break down dead organisms, returning \
            nutrients to the soil while the last of the usable energy \
            dissipates.",
        answer: "The flow of energy through an ecosystem",
    },
];

/// Immutable, ordered catalog of worked examples, queryable by difficulty.
///
/// Built once at process start and shared read-only (typically behind an
/// `Arc`). No mutation API exists.
#[derive(Debug)]
pub struct ExampleBank {
    examples: &'static [Example],
}

impl ExampleBank {
    /// The built-in bank. Every tier 1–5 is covered — the prompt builder
    /// relies on at least one exemplar per tier it may be asked to produce.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_EXAMPLES)
    }

    /// Build a bank from a custom example table.
    pub fn new(examples: &'static [Example]) -> Self {
        debug_assert!(
            (MIN_DIFFICULTY..=MAX_DIFFICULTY)
                .all(|tier| examples.iter().any(|e| e.difficulty == tier)),
            "example bank must cover every tier {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"
        );
        Self { examples }
    }

    /// All examples at exactly `difficulty`, in bank order.
    pub fn at_tier(&self, difficulty: u8) -> Result<Vec<&Example>, EnigmaError> {
        check_tier(difficulty)?;
        Ok(self
            .examples
            .iter()
            .filter(|e| e.difficulty == difficulty)
            .collect())
    }

    /// All examples at or below `difficulty`, in bank order.
    pub fn at_or_below(&self, difficulty: u8) -> Result<Vec<&Example>, EnigmaError> {
        check_tier(difficulty)?;
        Ok(self
            .examples
            .iter()
            .filter(|e| e.difficulty <= difficulty)
            .collect())
    }

    /// The exemplar ladder for a requested tier: the first example at each
    /// tier `1..=difficulty`, in ascending order. Deterministic — identical
    /// input always selects the identical set.
    pub fn exemplar_ladder(&self, difficulty: u8) -> Result<Vec<&Example>, EnigmaError> {
        check_tier(difficulty)?;
        Ok((MIN_DIFFICULTY..=difficulty)
            .filter_map(|tier| self.examples.iter().find(|e| e.difficulty == tier))
            .collect())
    }

    /// Number of examples in the bank.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

fn check_tier(difficulty: u8) -> Result<(), EnigmaError> {
    if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        Ok(())
    } else {
        Err(EnigmaError::InvalidDifficulty(difficulty))
    }
}
