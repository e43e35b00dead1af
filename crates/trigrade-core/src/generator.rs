//! Randomized objective item generators.
//!
//! One generator per topic. Each draws its parameters from the caller's
//! seeded [`StdRng`], keeps the scenario geometrically valid, computes the
//! canonical answer, and shuffles the answer choices. [`generate_quiz`]
//! assembles a reproducible quiz from a seed.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{ItemKind, ObjectiveItem, Topic};

/// Points awarded for every generated item.
pub const ITEM_POINTS: u32 = 2;
/// Smallest quiz that can be generated.
pub const MIN_ITEMS: usize = 5;
/// Largest quiz that can be generated.
pub const MAX_ITEMS: usize = 20;
/// Upper bound on the two given angles of an angle-sum item, so the third
/// angle is at least 11°.
pub const MAX_GIVEN_ANGLE_SUM: u32 = 169;

pub const EQUILATERAL: &str = "equilateral triangle";
pub const ISOSCELES: &str = "isosceles triangle";
pub const SCALENE: &str = "scalene triangle";
pub const RIGHT: &str = "right triangle";
pub const ACUTE: &str = "acute triangle";
pub const OBTUSE: &str = "obtuse triangle";

pub const SIMILAR_AA: &str = "possible (AA)";
const SIMILARITY_CHOICES: [&str; 4] = [SIMILAR_AA, "not possible", "possible (SSS)", "possible (SAS)"];
const CONGRUENCE_CHOICES: [&str; 4] = ["SSS", "SAS", "ASA", "AAS"];
const TRUE_FALSE: [&str; 2] = ["true", "false"];

/// Angles offered by the angle-classification variant.
const CLASSIFIED_ANGLES: [u32; 8] = [30, 45, 60, 70, 80, 90, 100, 120];

/// Parameters of one quiz generation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizOptions {
    pub seed: u64,
    pub item_count: usize,
    pub topics: Vec<Topic>,
    /// Emit numeric-entry angle items and true/false similarity items.
    #[serde(default)]
    pub varied_formats: bool,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            item_count: 10,
            topics: Topic::ALL.to_vec(),
            varied_formats: false,
        }
    }
}

/// Draw a multiple of `step` from `lo..=hi`.
fn stepped(rng: &mut StdRng, lo: u32, hi: u32, step: u32) -> u32 {
    lo + step * rng.gen_range(0..=(hi - lo) / step)
}

fn shuffled(rng: &mut StdRng, choices: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut choices: Vec<String> = choices.into_iter().collect();
    choices.shuffle(rng);
    choices
}

fn four_digit_suffix(rng: &mut StdRng) -> u32 {
    rng.gen_range(1000..=9999)
}

/// Numeric item if `varied`, otherwise a multiple-choice item over
/// `answer` plus the given offsets.
fn angle_item(
    rng: &mut StdRng,
    varied: bool,
    id: String,
    topic: Topic,
    stem: String,
    answer: u32,
    offsets: [i64; 3],
) -> ObjectiveItem {
    let (kind, choices) = if varied {
        (ItemKind::Numeric, Vec::new())
    } else {
        let distractors = offsets
            .iter()
            .map(|d| (i64::from(answer) + d).to_string());
        let all = std::iter::once(answer.to_string()).chain(distractors);
        (ItemKind::MultipleChoice, shuffled(rng, all))
    };
    ObjectiveItem {
        id,
        topic,
        stem,
        choices,
        answer: answer.to_string(),
        also_accepted: Vec::new(),
        kind,
        points: ITEM_POINTS,
    }
}

fn sample_given_angles(rng: &mut StdRng) -> (u32, u32) {
    loop {
        let a = stepped(rng, 20, 120, 5);
        let b = stepped(rng, 20, 120, 5);
        if a + b <= MAX_GIVEN_ANGLE_SUM {
            return (a, b);
        }
    }
}

/// Two interior angles given, third angle asked.
pub fn angle_sum_item(rng: &mut StdRng, varied: bool) -> ObjectiveItem {
    let (a, b) = sample_given_angles(rng);
    let third = 180 - (a + b);
    let stem = format!(
        "Two interior angles of a triangle measure {a}° and {b}°. \
         What is the measure of the third angle?"
    );
    angle_item(
        rng,
        varied,
        format!("AS-{a}-{b}"),
        Topic::AngleSum,
        stem,
        third,
        [5, -5, 10],
    )
}

/// An exterior angle equals the sum of the two remote interior angles.
pub fn exterior_angle_item(rng: &mut StdRng, varied: bool) -> ObjectiveItem {
    let exterior = stepped(rng, 100, 155, 5);
    let remote = stepped(rng, 20, 65, 5);
    let other = exterior - remote;
    let stem = format!(
        "An exterior angle of a triangle measures {exterior}°. One of the remote \
         interior angles measures {remote}°. What is the measure of the other remote \
         interior angle?"
    );
    angle_item(
        rng,
        varied,
        format!("EX-{exterior}-{remote}"),
        Topic::ExteriorAngle,
        stem,
        other,
        [5, -10, 15],
    )
}

/// Classify a triangle by its side lengths.
pub fn classify_by_sides(a: u32, b: u32, c: u32) -> &'static str {
    if a == b && b == c {
        EQUILATERAL
    } else if a == b || b == c || a == c {
        ISOSCELES
    } else {
        SCALENE
    }
}

/// Classify a triangle from one known angle: exactly 90° is right, above is
/// obtuse, below is acute.
pub fn classify_by_angle(angle: u32) -> &'static str {
    match angle {
        90 => RIGHT,
        a if a > 90 => OBTUSE,
        _ => ACUTE,
    }
}

fn is_pythagorean(sides: &[u32; 3]) -> bool {
    sides[0] * sides[0] + sides[1] * sides[1] == sides[2] * sides[2]
}

/// Sorted side lengths in `3..=11` that form a proper, non-right triangle.
fn sample_side_lengths(rng: &mut StdRng) -> [u32; 3] {
    loop {
        let mut sides = [
            rng.gen_range(3..=11),
            rng.gen_range(3..=11),
            rng.gen_range(3..=11),
        ];
        sides.sort_unstable();
        // A right triangle would make the "right triangle" distractor correct too.
        if sides[0] + sides[1] > sides[2] && !is_pythagorean(&sides) {
            return sides;
        }
    }
}

/// Classify a triangle either by three side lengths or by one angle.
pub fn triangle_types_item(rng: &mut StdRng, _varied: bool) -> ObjectiveItem {
    let (stem, answer, choices) = if rng.gen_bool(0.5) {
        let [a, b, c] = sample_side_lengths(rng);
        (
            format!("A triangle has sides of length {a}, {b}, and {c}. How is it classified?"),
            classify_by_sides(a, b, c),
            [EQUILATERAL, ISOSCELES, RIGHT, SCALENE],
        )
    } else {
        let angle = CLASSIFIED_ANGLES[rng.gen_range(0..CLASSIFIED_ANGLES.len())];
        (
            format!("One angle of a triangle measures {angle}°. How is the triangle classified?"),
            classify_by_angle(angle),
            [ACUTE, RIGHT, OBTUSE, EQUILATERAL],
        )
    };
    let choices = shuffled(rng, choices.iter().map(|c| c.to_string()));
    ObjectiveItem {
        id: format!("TT-{}", four_digit_suffix(rng)),
        topic: Topic::TriangleTypes,
        stem,
        choices,
        answer: answer.to_string(),
        also_accepted: Vec::new(),
        kind: ItemKind::MultipleChoice,
        points: ITEM_POINTS,
    }
}

/// Which correspondences two triangles are stated to share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CongruencePattern {
    ThreeSides,
    TwoSidesIncludedAngle,
    TwoAnglesNonIncludedSide,
    /// Side position unstated: ASA and AAS both apply.
    TwoAnglesAnySide,
}

impl CongruencePattern {
    const ALL: [CongruencePattern; 4] = [
        CongruencePattern::ThreeSides,
        CongruencePattern::TwoSidesIncludedAngle,
        CongruencePattern::TwoAnglesNonIncludedSide,
        CongruencePattern::TwoAnglesAnySide,
    ];

    fn statement(&self) -> &'static str {
        match self {
            CongruencePattern::ThreeSides => "all three pairs of corresponding sides are equal",
            CongruencePattern::TwoSidesIncludedAngle => {
                "two pairs of sides and the angles between them are equal"
            }
            CongruencePattern::TwoAnglesNonIncludedSide => {
                "two pairs of angles and a pair of sides not between them are equal"
            }
            CongruencePattern::TwoAnglesAnySide => "two pairs of angles and a pair of sides are equal",
        }
    }

    /// Canonical criterion followed by any other accepted criteria.
    fn criteria(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            CongruencePattern::ThreeSides => ("SSS", &[]),
            CongruencePattern::TwoSidesIncludedAngle => ("SAS", &[]),
            CongruencePattern::TwoAnglesNonIncludedSide => ("AAS", &[]),
            CongruencePattern::TwoAnglesAnySide => ("ASA", &["AAS"]),
        }
    }
}

/// Name the criterion that proves two triangles congruent.
pub fn congruence_item(rng: &mut StdRng, _varied: bool) -> ObjectiveItem {
    let pattern = CongruencePattern::ALL[rng.gen_range(0..CongruencePattern::ALL.len())];
    let (answer, also) = pattern.criteria();
    let stem = format!(
        "In two triangles, {}. Which criterion proves the triangles congruent?",
        pattern.statement()
    );
    let choices = shuffled(rng, CONGRUENCE_CHOICES.iter().map(|c| c.to_string()));
    ObjectiveItem {
        id: format!("CG-{}", four_digit_suffix(rng)),
        topic: Topic::Congruence,
        stem,
        choices,
        answer: answer.to_string(),
        also_accepted: also.iter().map(|c| c.to_string()).collect(),
        kind: ItemKind::MultipleChoice,
        points: ITEM_POINTS,
    }
}

/// Two equal angle pairs: AA similarity.
pub fn similarity_item(rng: &mut StdRng, varied: bool) -> ObjectiveItem {
    let a = [30, 40, 50, 60][rng.gen_range(0..4)];
    let b = [40, 50, 60, 70][rng.gen_range(0..4)];
    let premise = format!(
        "Two angles of one triangle measure {a}° and {b}°, and two angles of another \
         triangle also measure {a}° and {b}°."
    );
    let (stem, answer, choices, kind) = if varied {
        let (claim, truth) = if rng.gen_bool(0.5) {
            ("The triangles are similar by AA.", "true")
        } else {
            ("Similarity cannot be decided from angles alone.", "false")
        };
        (
            format!("{premise} True or false: {claim}"),
            truth,
            TRUE_FALSE.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            ItemKind::TrueFalse,
        )
    } else {
        (
            format!("{premise} Can the triangles be shown to be similar?"),
            SIMILAR_AA,
            shuffled(rng, SIMILARITY_CHOICES.iter().map(|c| c.to_string())),
            ItemKind::MultipleChoice,
        )
    };
    ObjectiveItem {
        id: format!("SIM-{a}-{b}"),
        topic: Topic::SimilarityBasic,
        stem,
        choices,
        answer: answer.to_string(),
        also_accepted: Vec::new(),
        kind,
        points: ITEM_POINTS,
    }
}

/// Run the generator for `topic`.
pub fn generate_item(topic: Topic, rng: &mut StdRng, varied: bool) -> ObjectiveItem {
    match topic {
        Topic::AngleSum => angle_sum_item(rng, varied),
        Topic::ExteriorAngle => exterior_angle_item(rng, varied),
        Topic::TriangleTypes => triangle_types_item(rng, varied),
        Topic::Congruence => congruence_item(rng, varied),
        Topic::SimilarityBasic => similarity_item(rng, varied),
    }
}

/// Generate a quiz. The same options always yield the same items.
///
/// Each position draws its topic uniformly from the selection. Item ids that
/// repeat within the quiz get a `-2`, `-3`, ... suffix.
pub fn generate_quiz(options: &QuizOptions) -> Result<Vec<ObjectiveItem>, SessionError> {
    let mut topics: Vec<Topic> = Vec::new();
    for topic in &options.topics {
        if !topics.contains(topic) {
            topics.push(*topic);
        }
    }
    if topics.is_empty() {
        return Err(SessionError::EmptyTopicSelection);
    }
    if !(MIN_ITEMS..=MAX_ITEMS).contains(&options.item_count) {
        return Err(SessionError::ItemCount {
            requested: options.item_count,
            min: MIN_ITEMS,
            max: MAX_ITEMS,
        });
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut items = Vec::with_capacity(options.item_count);

    for _ in 0..options.item_count {
        let topic = topics[rng.gen_range(0..topics.len())];
        let mut item = generate_item(topic, &mut rng, options.varied_formats);
        let occurrences = seen.entry(item.id.clone()).or_insert(0);
        *occurrences += 1;
        if *occurrences > 1 {
            let unique = format!("{}-{}", item.id, occurrences);
            tracing::warn!("duplicate item id {}, renamed to {}", item.id, unique);
            item.id = unique;
        }
        items.push(item);
    }

    tracing::info!(
        seed = options.seed,
        count = items.len(),
        topics = ?topics,
        "generated quiz"
    );
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn given_angles_leave_room_for_third() {
        for seed in 0..300 {
            let (a, b) = sample_given_angles(&mut rng(seed));
            assert!(a + b <= MAX_GIVEN_ANGLE_SUM, "seed {seed}: {a} + {b}");
            assert!(180 - (a + b) >= 11);
        }
    }

    #[test]
    fn angle_sum_answer_is_supplement_of_given() {
        for seed in 0..300 {
            let item = angle_sum_item(&mut rng(seed), false);
            let parts: Vec<u32> = item.id[3..]
                .split('-')
                .map(|p| p.parse().unwrap())
                .collect();
            let (a, b) = (parts[0], parts[1]);
            assert!(a + b <= MAX_GIVEN_ANGLE_SUM);
            assert_eq!(item.answer, (180 - a - b).to_string());
            assert_eq!(item.choices.len(), 4);
            assert!(item.choices.contains(&item.answer));
        }
    }

    #[test]
    fn exterior_answer_is_difference() {
        for seed in 0..200 {
            let item = exterior_angle_item(&mut rng(seed), false);
            let parts: Vec<u32> = item.id[3..]
                .split('-')
                .map(|p| p.parse().unwrap())
                .collect();
            assert_eq!(item.answer, (parts[0] - parts[1]).to_string());
            let distinct: HashSet<&String> = item.choices.iter().collect();
            assert_eq!(distinct.len(), 4);
        }
    }

    #[test]
    fn side_lengths_satisfy_strict_triangle_inequality() {
        let mut patterns = HashSet::new();
        for seed in 0..500 {
            let [a, b, c] = sample_side_lengths(&mut rng(seed));
            assert!(a <= b && b <= c);
            assert!(a + b > c, "seed {seed}: {a}, {b}, {c}");
            assert!(a * a + b * b != c * c);
            let class = classify_by_sides(a, b, c);
            let expected = if a == c {
                EQUILATERAL
            } else if a == b || b == c {
                ISOSCELES
            } else {
                SCALENE
            };
            assert_eq!(class, expected);
            patterns.insert(class);
        }
        assert!(patterns.contains(SCALENE));
        assert!(patterns.contains(ISOSCELES));
    }

    #[test]
    fn angle_classification_thresholds() {
        assert_eq!(classify_by_angle(90), RIGHT);
        assert_eq!(classify_by_angle(89), ACUTE);
        assert_eq!(classify_by_angle(30), ACUTE);
        assert_eq!(classify_by_angle(91), OBTUSE);
        assert_eq!(classify_by_angle(120), OBTUSE);
    }

    #[test]
    fn classification_items_include_answer() {
        for seed in 0..200 {
            let item = triangle_types_item(&mut rng(seed), false);
            assert!(item.id.starts_with("TT-"));
            assert_eq!(item.choices.len(), 4);
            assert!(item.choices.contains(&item.answer));
        }
    }

    #[test]
    fn congruence_answers_follow_stated_pattern() {
        for seed in 0..200 {
            let item = congruence_item(&mut rng(seed), false);
            assert!(item.choices.contains(&item.answer));
            if item.stem.contains("not between them") {
                assert_eq!(item.answer, "AAS");
                assert!(item.also_accepted.is_empty());
            } else if item.stem.contains("two pairs of angles and a pair of sides are equal") {
                assert_eq!(item.answer, "ASA");
                assert_eq!(item.also_accepted, vec!["AAS".to_string()]);
            } else if item.stem.contains("three pairs") {
                assert_eq!(item.answer, "SSS");
            } else {
                assert_eq!(item.answer, "SAS");
            }
        }
    }

    #[test]
    fn varied_formats_change_item_kinds() {
        let item = angle_sum_item(&mut rng(7), true);
        assert_eq!(item.kind, ItemKind::Numeric);
        assert!(item.choices.is_empty());

        let item = similarity_item(&mut rng(7), true);
        assert_eq!(item.kind, ItemKind::TrueFalse);
        assert_eq!(item.choices, vec!["true".to_string(), "false".to_string()]);
        assert!(item.choices.contains(&item.answer));
    }

    #[test]
    fn seed_42_quiz_has_ten_answerable_items() {
        let items = generate_quiz(&QuizOptions::default()).unwrap();
        assert_eq!(items.len(), 10);
        for item in &items {
            assert_eq!(item.kind, ItemKind::MultipleChoice);
            assert!(!item.choices.is_empty());
            assert!(item.choices.contains(&item.answer));
            assert_eq!(item.points, ITEM_POINTS);
        }
    }

    #[test]
    fn quiz_is_reproducible_from_seed() {
        let options = QuizOptions {
            seed: 2024,
            item_count: 15,
            ..QuizOptions::default()
        };
        assert_eq!(
            generate_quiz(&options).unwrap(),
            generate_quiz(&options).unwrap()
        );
    }

    #[test]
    fn quiz_only_uses_selected_topics() {
        let options = QuizOptions {
            topics: vec![Topic::Congruence, Topic::ExteriorAngle],
            item_count: 20,
            ..QuizOptions::default()
        };
        let items = generate_quiz(&options).unwrap();
        assert!(items
            .iter()
            .all(|i| i.topic == Topic::Congruence || i.topic == Topic::ExteriorAngle));
    }

    #[test]
    fn duplicate_ids_are_disambiguated() {
        // Only 16 distinct similarity ids exist, so 20 items must repeat some.
        let options = QuizOptions {
            topics: vec![Topic::SimilarityBasic],
            item_count: 20,
            ..QuizOptions::default()
        };
        let items = generate_quiz(&options).unwrap();
        let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
        assert!(items.iter().any(|i| i.id.matches('-').count() == 3));
    }

    #[test]
    fn quiz_rejects_bad_options() {
        let empty = QuizOptions {
            topics: vec![],
            ..QuizOptions::default()
        };
        assert_eq!(generate_quiz(&empty), Err(SessionError::EmptyTopicSelection));

        let too_many = QuizOptions {
            item_count: 21,
            ..QuizOptions::default()
        };
        assert!(matches!(
            generate_quiz(&too_many),
            Err(SessionError::ItemCount { requested: 21, .. })
        ));
    }
}
