//! Random fixture data for local development.
//!
//! Wipes the directory, then recreates countries, users and profiles from
//! three plain-text source files. The same `--seed` always yields the same
//! data set.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use roster::db::NewUser;
use roster::state::open_store;
use roster::Config;
use roster_models::{Enumerations, LabelEntry, ProfileDraft};

const KEYWORDS: &str = "My long keyword that I want to see if it gets cut correctly for small screen sizes, Another long annoying keyword";
const GRAD_YEARS: std::ops::RangeInclusive<u32> = 1950..=2020;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Random seed; the same seed recreates the same directory
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Number of profiles to create
    #[arg(long, default_value_t = 100)]
    pub profiles: usize,
    /// Lines of `name<TAB>code`
    #[arg(long)]
    pub countries: PathBuf,
    /// One institution per line
    #[arg(long)]
    pub institutions: PathBuf,
    /// One `First Last` per line
    #[arg(long)]
    pub names: PathBuf,
    /// Wipe even when `admin.allow_seed` is off
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCountry {
    pub code: String,
    pub name: String,
    pub is_under_represented: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedProfile {
    pub user: NewUser,
    pub draft: ProfileDraft,
}

/// Parsed source files.
#[derive(Debug, Default)]
pub struct Sources {
    pub countries: Vec<(String, String)>,
    pub institutions: Vec<String>,
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
}

impl Sources {
    pub fn parse(countries: &str, institutions: &str, names: &str) -> Result<Self> {
        let countries = non_blank(countries)
            .map(|line| {
                let (name, code) = line
                    .split_once('\t')
                    .with_context(|| format!("country line '{line}' is not name<TAB>code"))?;
                Ok((name.trim().to_string(), code.trim().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        let institutions = non_blank(institutions).map(String::from).collect();
        // First and last names are drawn independently, so each line feeds both pools.
        let mut first_names = Vec::new();
        let mut last_names = Vec::new();
        for line in non_blank(names) {
            match line.split_once(char::is_whitespace) {
                Some((first, last)) => {
                    first_names.push(first.to_string());
                    last_names.push(last.trim().to_string());
                }
                None => first_names.push(line.to_string()),
            }
        }

        Ok(Self {
            countries,
            institutions,
            first_names,
            last_names,
        })
    }

    fn read(args: &SeedArgs) -> Result<Self> {
        Self::parse(
            &read(&args.countries)?,
            &read(&args.institutions)?,
            &read(&args.names)?,
        )
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn non_blank(contents: &str) -> impl Iterator<Item = &str> {
    contents.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn pick(rng: &mut StdRng, entries: &[LabelEntry]) -> String {
    entries
        .choose(rng)
        .map(|e| e.code.clone())
        .unwrap_or_default()
}

pub fn generate_countries(rng: &mut StdRng, sources: &Sources) -> Vec<SeedCountry> {
    sources
        .countries
        .iter()
        .map(|(name, code)| SeedCountry {
            code: code.clone(),
            name: name.clone(),
            is_under_represented: rng.gen::<f64>() > 0.5,
        })
        .collect()
}

pub fn generate_profiles(
    rng: &mut StdRng,
    sources: &Sources,
    enums: &Enumerations,
    count: usize,
) -> Result<Vec<SeedProfile>> {
    if sources.first_names.is_empty()
        || sources.last_names.is_empty()
        || sources.institutions.is_empty()
    {
        bail!("seed needs at least one `First Last` name and one institution");
    }
    let mut profiles = Vec::with_capacity(count);
    for _ in 0..count {
        let first = sources.first_names.choose(rng).cloned().unwrap_or_default();
        let last = sources.last_names.choose(rng).cloned().unwrap_or_default();
        let institution = sources.institutions.choose(rng).cloned().unwrap_or_default();
        let full_name = format!("{first} {last}");
        let slug = slugify(&full_name);

        // Duplicate names are common; the suffix keeps usernames apart most of the time.
        let username = format!("{}{}{}", first, last, rng.gen_range(1..=100)).to_lowercase();
        let email = format!("{}@{}.edu", slug, slugify(&institution));

        let draft = ProfileDraft {
            is_public: rng.gen::<f64>() > 0.2,
            first_name: first,
            last_name: last,
            contact_email: email.clone(),
            webpage: format!("http://{slug}.me"),
            institution,
            country_code: sources.countries.choose(rng).map(|(_, code)| code.clone()),
            position: pick(rng, enums.positions.entries()),
            grad_month: pick(rng, enums.months.entries()),
            grad_year: rng.gen_range(GRAD_YEARS).to_string(),
            methods: [pick(rng, enums.methods.entries())].into_iter().collect(),
            applications: [pick(rng, enums.applications.entries())].into_iter().collect(),
            keywords: KEYWORDS.to_string(),
            ..Default::default()
        };

        profiles.push(SeedProfile {
            user: NewUser {
                username,
                name: full_name,
                email,
            },
            draft,
        });
    }
    Ok(profiles)
}

pub async fn run(config: &Config, args: SeedArgs) -> Result<()> {
    if !args.force && !config.admin.allow_seed {
        bail!("seed wipes the directory; pass --force or set admin.allow_seed = true");
    }

    let sources = Sources::read(&args)?;
    let enums = config.directory.load_enumerations()?;
    let mut rng = StdRng::seed_from_u64(args.seed);

    let countries = generate_countries(&mut rng, &sources);
    let profiles = generate_profiles(&mut rng, &sources, &enums, args.profiles)?;

    let (store, _) = open_store(config).await?;
    store.clear_directory().await?;
    tracing::warn!("Directory cleared");

    let mut country_ids = std::collections::HashMap::new();
    for country in &countries {
        let stored = store
            .upsert_country(&country.code, &country.name, country.is_under_represented)
            .await
            .with_context(|| format!("Failed to create country {}", country.code))?;
        country_ids.insert(stored.code.clone(), stored.id);
    }

    let mut created = 0usize;
    for SeedProfile { user, mut draft } in profiles {
        let user = match store.create_user(user).await {
            Ok(user) => user,
            Err(roster::Error::Conflict(reason)) => {
                tracing::debug!(reason = %reason, "Skipping duplicate fixture user");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        draft.user_id = Some(user.id);
        let country_id = draft
            .country_code
            .as_ref()
            .and_then(|code| country_ids.get(code).copied());
        store.create_profile(draft, country_id).await?;
        created += 1;
    }

    tracing::info!(
        seed = args.seed,
        countries = countries.len(),
        profiles = created,
        "Fixture data created"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Sources {
        Sources::parse(
            "Bolivia\tBOL\nFrance\tFRA\n",
            "Universidad Mayor de San Andrés\nSorbonne\n",
            "Ana Mamani\nLuc Martin\nOnlyname\n",
        )
        .unwrap()
    }

    #[test]
    fn parses_source_files() {
        let sources = sources();
        assert_eq!(sources.countries[0], ("Bolivia".to_string(), "BOL".to_string()));
        assert_eq!(sources.institutions.len(), 2);
        assert_eq!(sources.first_names, vec!["Ana", "Luc", "Onlyname"]);
        assert_eq!(sources.last_names, vec!["Mamani", "Martin"]);
    }

    #[test]
    fn country_lines_need_a_tab() {
        assert!(Sources::parse("Bolivia BOL\n", "", "").is_err());
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Universidad Mayor de San Andrés"), "universidad-mayor-de-san-andr-s");
        assert_eq!(slugify("  Ana  Mamani "), "ana-mamani");
    }

    #[test]
    fn same_seed_same_data() {
        let enums = Enumerations::default();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let countries = generate_countries(&mut rng, &sources());
            let profiles = generate_profiles(&mut rng, &sources(), &enums, 20).unwrap();
            (countries, profiles)
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn generated_drafts_validate() {
        let enums = Enumerations::default();
        let mut rng = StdRng::seed_from_u64(42);
        let profiles = generate_profiles(&mut rng, &sources(), &enums, 50).unwrap();

        for profile in &profiles {
            assert!(profile.draft.validate(&enums).is_ok(), "{:?}", profile.draft);
            assert_eq!(profile.draft.methods.len(), 1);
            assert_eq!(profile.draft.applications.len(), 1);
            assert!(profile.user.email.ends_with(".edu"));
        }
    }

    #[test]
    fn first_and_last_names_are_drawn_independently() {
        let sources = Sources::parse(
            "Bolivia\tBOL\n",
            "Sorbonne\n",
            "Ana Mamani\nLuc Martin\nEva Quispe\n",
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let profiles = generate_profiles(&mut rng, &sources, &Enumerations::default(), 200).unwrap();

        let pairs: std::collections::BTreeSet<(String, String)> = profiles
            .iter()
            .map(|p| (p.draft.first_name.clone(), p.draft.last_name.clone()))
            .collect();
        assert!(pairs.len() > 3, "only the listed pairs came back: {pairs:?}");
    }

    #[test]
    fn single_word_names_alone_are_rejected() {
        let sources = Sources::parse("", "Sorbonne\n", "Onlyname\n").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_profiles(&mut rng, &sources, &Enumerations::default(), 1).is_err());
    }

    #[test]
    fn empty_sources_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_profiles(&mut rng, &Sources::default(), &Enumerations::default(), 1);
        assert!(err.is_err());
    }
}
