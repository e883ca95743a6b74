//! Deterministic manager name generation from curated name lists.
//!
//! Names follow the console's "Surname I.O." display form.
//! Same RNG seed = same names.

use crate::rng::SeededRng;

pub struct NameGenerator;

impl NameGenerator {
    /// "Surname I.O.", with the surname in the matching grammatical gender.
    pub fn generate_display_name(rng: &mut SeededRng) -> String {
        let (surname_m, surname_f) = *rng.pick(Self::surnames());
        let female = rng.chance(0.5);
        let surname = if female { surname_f } else { surname_m };
        let first = rng.pick(Self::initials());
        let patronymic = rng.pick(Self::initials());
        format!("{surname} {first}.{patronymic}.")
    }

    /// (masculine, feminine) surname pairs.
    fn surnames() -> &'static [(&'static str, &'static str)] {
        &[
            ("Иванов", "Иванова"),
            ("Петров", "Петрова"),
            ("Сидоров", "Сидорова"),
            ("Кузнецов", "Кузнецова"),
            ("Смирнов", "Смирнова"),
            ("Нурланов", "Нурланова"),
            ("Алиев", "Алиева"),
            ("Джумабаев", "Джумабаева"),
            ("Ахметов", "Ахметова"),
            ("Жумабеков", "Жумабекова"),
            ("Сейтказиев", "Сейтказиева"),
            ("Омаров", "Омарова"),
            ("Касымов", "Касымова"),
            ("Абдрахманов", "Абдрахманова"),
            ("Ким", "Ким"),
            ("Волков", "Волкова"),
        ]
    }

    fn initials() -> &'static [&'static str] {
        &["А", "Б", "В", "Г", "Д", "Е", "Ж", "К", "Л", "М", "Н", "О", "П", "Р", "С", "Т"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng1 = RngBank::new(12345).for_stream(StreamSlot::Managers);
        let mut rng2 = RngBank::new(12345).for_stream(StreamSlot::Managers);
        assert_eq!(
            NameGenerator::generate_display_name(&mut rng1),
            NameGenerator::generate_display_name(&mut rng2),
            "Same seed should produce same name"
        );
    }

    #[test]
    fn generates_surname_and_initials() {
        let mut rng = RngBank::new(12345).for_stream(StreamSlot::Managers);
        for _ in 0..100 {
            let name = NameGenerator::generate_display_name(&mut rng);
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 2, "Name should have surname and initials: {name}");
            assert_eq!(parts[1].chars().filter(|c| *c == '.').count(), 2, "{name}");
        }
    }
}
