use db::candidates::Candidate;
use db::voters::Voter;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::randomuser::Person;

pub(crate) const PARTIES: [&str; 3] = ["BJP", "Congress", "Trinamool"];

/// Turns fetched people into rows. Owns the seeded generator, so for a
/// fixed seed the party draws and generated numbers come out in the same
/// order on every run.
pub(crate) struct Transformer {
    rng: StdRng,
}

impl Transformer {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub(crate) fn candidates(&mut self, people: &[Person]) -> Vec<Candidate> {
        people
            .iter()
            .enumerate()
            .map(|(index, person)| self.candidate(index + 1, person))
            .collect()
    }

    pub(crate) fn voters(&mut self, people: &[Person]) -> Vec<Voter> {
        people.iter().map(|person| self.voter(person)).collect()
    }

    fn candidate(&mut self, ordinal: usize, person: &Person) -> Candidate {
        let candidate_name = format!("{} {}", person.name.first, person.name.last);
        let party_affiliation = PARTIES[self.rng.gen_range(0..PARTIES.len())];

        Candidate {
            candidate_id: ordinal.to_string(),
            biography: format!(
                "{candidate_name} has spent two decades in public service and now heads the {party_affiliation} ticket."
            ),
            campaign_platform: format!(
                "{candidate_name}'s platform centres on jobs, schools and clean water."
            ),
            candidate_name,
            party_affiliation: party_affiliation.to_string(),
            photo_url: person.picture.large.clone(),
        }
    }

    fn voter(&mut self, person: &Person) -> Voter {
        // 12-digit id, collisions are not checked
        let voter_id = self
            .rng
            .gen_range(100_000_000_000_u64..1_000_000_000_000_u64)
            .to_string();
        let registration_number = self.rng.gen_range(10_000_000_u64..100_000_000_u64).to_string();

        Voter {
            voter_id,
            voter_name: format!("{} {}", person.name.first, person.name.last),
            date_of_birth: person.dob.date.clone(),
            gender: person.gender.clone(),
            nationality: person.nat.clone(),
            registration_number,
            address_street: format!(
                "{} {}",
                person.location.street.number, person.location.street.name
            ),
            address_city: person.location.city.clone(),
            address_state: person.location.state.clone(),
            address_country: person.location.country.clone(),
            address_postcode: person.location.postcode.to_string(),
            email: person.email.clone(),
            phone_number: person.phone.clone(),
            cell_number: person.cell.clone(),
            picture: person.picture.large.clone(),
            registered_age: person.dob.age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomuser::sample_person;

    #[test]
    fn one_row_per_person_with_non_empty_ids() {
        let people = vec![sample_person(); 5];
        let mut transformer = Transformer::new(7);

        let candidates = transformer.candidates(&people);
        let voters = transformer.voters(&people);

        assert_eq!(candidates.len(), 5);
        assert_eq!(voters.len(), 5);
        assert!(candidates.iter().all(|c| !c.candidate_id.is_empty()));
        assert!(voters.iter().all(|v| !v.voter_id.is_empty()));
    }

    #[test]
    fn parties_come_from_the_fixed_set() {
        let people = vec![sample_person(); 20];
        let mut transformer = Transformer::new(3);

        for candidate in transformer.candidates(&people) {
            assert!(PARTIES.contains(&candidate.party_affiliation.as_str()));
        }
    }

    #[test]
    fn seed_21_gives_sequential_candidate_ids() {
        let people = vec![sample_person(); 3];
        let mut transformer = Transformer::new(21);

        let candidates = transformer.candidates(&people);

        let ids: Vec<_> = candidates.iter().map(|c| c.candidate_id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn a_fixed_seed_reproduces_the_same_sequences() {
        let people = vec![sample_person(); 10];

        let first_parties: Vec<_> = Transformer::new(21)
            .candidates(&people)
            .into_iter()
            .map(|c| c.party_affiliation)
            .collect();
        let second_parties: Vec<_> = Transformer::new(21)
            .candidates(&people)
            .into_iter()
            .map(|c| c.party_affiliation)
            .collect();
        assert_eq!(first_parties, second_parties);

        let first_voters = Transformer::new(21).voters(&people);
        let second_voters = Transformer::new(21).voters(&people);
        for (a, b) in first_voters.iter().zip(&second_voters) {
            assert_eq!(a.voter_id, b.voter_id);
            assert_eq!(a.registration_number, b.registration_number);
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let people = vec![sample_person(); 10];

        let a: Vec<_> = Transformer::new(1).voters(&people);
        let b: Vec<_> = Transformer::new(2).voters(&people);

        let a_ids: Vec<_> = a.iter().map(|v| v.voter_id.clone()).collect();
        let b_ids: Vec<_> = b.iter().map(|v| v.voter_id.clone()).collect();
        assert_ne!(a_ids, b_ids);
    }

    #[test]
    fn generated_numbers_have_the_expected_widths() {
        let people = vec![sample_person(); 50];
        let mut transformer = Transformer::new(9);

        for voter in transformer.voters(&people) {
            assert_eq!(voter.voter_id.len(), 12);
            assert_eq!(voter.registration_number.len(), 8);
        }
    }

    #[test]
    fn candidate_text_interpolates_the_display_name() {
        let people = vec![sample_person()];
        let mut transformer = Transformer::new(4);

        let candidate = transformer.candidates(&people).remove(0);

        assert_eq!(candidate.candidate_name, "Asha Rao");
        assert!(candidate.biography.contains("Asha Rao"));
        assert!(candidate.biography.contains(&candidate.party_affiliation));
        assert!(candidate.campaign_platform.contains("Asha Rao"));
    }
}
