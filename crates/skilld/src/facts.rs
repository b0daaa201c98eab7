//! Space facts served on launch.

use rand::Rng;

pub const FACTS: [&str; 13] = [
    "A year on Mercury is just 88 days long.",
    "Despite being farther from the Sun, Venus experiences higher temperatures than Mercury.",
    "Venus rotates counter-clockwise, possibly because of a collision in the past with an asteroid.",
    "On Mars, the Sun appears about half the size as it does on Earth.",
    "Earth is the only planet not named after a god.",
    "Jupiter has the shortest day of all the planets.",
    "The Milky Way galaxy will collide with the Andromeda Galaxy in about 5 billion years.",
    "The Sun contains 99.86% of the mass in the Solar System.",
    "The Sun is an almost perfect sphere.",
    "A total solar eclipse can happen once every 1 to 2 years. This makes them a rare event.",
    "Saturn radiates two and a half times more energy into space than it receives from the sun.",
    "The temperature inside the Sun can reach 15 million degrees Celsius.",
    "The Moon is moving approximately 3.8 cm away from our planet every year.",
];

/// Pick a fact uniformly at random. Independent across calls.
pub fn random_fact<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FACTS[rng.random_range(0..FACTS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn random_fact_comes_from_list() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(FACTS.contains(&random_fact(&mut rng)));
        }
    }

    #[test]
    fn random_fact_eventually_covers_every_entry() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<&str> = (0..2000).map(|_| random_fact(&mut rng)).collect();
        assert_eq!(seen.len(), FACTS.len());
    }

    #[test]
    fn facts_are_distinct_and_non_empty() {
        let unique: HashSet<&str> = FACTS.iter().copied().collect();
        assert_eq!(unique.len(), FACTS.len());
        assert!(FACTS.iter().all(|f| !f.trim().is_empty()));
    }
}
