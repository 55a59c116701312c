use std::collections::BTreeMap;

use crate::api::{ActionSpec, OptionSpec};
use crate::matcher::token::*;
use crate::model::Value;
use crate::parser::ParseError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The outcome of option matching: the bound options, and the tokens left for positional binding.
#[derive(Debug)]
pub(crate) struct OptionMatches {
    pub values: BTreeMap<String, Value>,
    pub remainder: Vec<String>,
}

struct OptionMatcher<'s> {
    spec: &'s ActionSpec,
    values: BTreeMap<String, Value>,
    remainder: Vec<String>,
}

impl<'s> OptionMatcher<'s> {
    fn new(spec: &'s ActionSpec) -> Self {
        Self {
            spec,
            values: BTreeMap::default(),
            remainder: Vec::default(),
        }
    }

    /// Feed a long option token, such as:
    ///  --verbose
    ///  --count 32
    ///  --count=32
    ///
    /// Returns whether the `lookahead` was used up as the option's value.
    fn feed_long(&mut self, token: &str, lookahead: Option<&str>) -> Result<bool, ParseError> {
        let spec = self.spec;
        let stripped = &token[TERMINATOR.len()..];
        let (key, attached) = split_equals_delimiter(stripped);

        let (name, option) = match spec.option_by_long(key) {
            Some(found) => found,
            None => {
                // Unknown long options are left over without their dashes.
                self.remainder.push(stripped.to_string());
                return Ok(false);
            }
        };

        if option.takes_value() {
            match attached {
                Some(value) => {
                    self.accumulate(name, option, Some(value))?;
                    Ok(false)
                }
                None => match lookahead.filter(|next| !is_option(next)) {
                    Some(value) => {
                        self.accumulate(name, option, Some(value))?;
                        Ok(true)
                    }
                    None => Err(ParseError::MissingOptionValue(format!("--{key}"))),
                },
            }
        } else if attached.is_some() {
            Err(ParseError::UnexpectedOptionValue(format!("--{key}")))
        } else {
            self.accumulate(name, option, None)?;
            Ok(false)
        }
    }

    /// Feed a short option token, such as (both -v and -c are example short options, where -c takes a value):
    ///  -v
    ///  -vvv
    ///  -c32
    ///  -c 32
    ///  -vvc32
    ///  -vvc 32
    ///
    /// Returns whether the `lookahead` was used up as the option's value.
    fn feed_short(&mut self, token: &str, lookahead: Option<&str>) -> Result<bool, ParseError> {
        let spec = self.spec;
        let mut cluster = &token[1..];

        // Peel one short option off the front of the cluster at a time.
        // Value-less options continue into the residue; a value-taking option claims it.
        loop {
            let mut chars = cluster.chars();
            let key = match chars.next() {
                Some(key) => key,
                None => unreachable!("internal error - a short option cluster cannot be empty"),
            };
            let residue = chars.as_str();

            let (name, option) = match spec.option_by_short(key) {
                Some(found) => found,
                None => {
                    self.remainder.push(format!("-{cluster}"));
                    return Ok(false);
                }
            };

            if option.takes_value() {
                if !residue.is_empty() {
                    self.accumulate(name, option, Some(residue))?;
                    return Ok(false);
                }

                return match lookahead.filter(|next| !is_option(next)) {
                    Some(value) => {
                        self.accumulate(name, option, Some(value))?;
                        Ok(true)
                    }
                    None => Err(ParseError::MissingOptionValue(format!("-{key}"))),
                };
            }

            self.accumulate(name, option, None)?;

            if residue.is_empty() {
                return Ok(false);
            }

            cluster = residue;
        }
    }

    fn accumulate(
        &mut self,
        name: &str,
        option: &OptionSpec,
        raw: Option<&str>,
    ) -> Result<(), ParseError> {
        let value = option.accumulate(self.values.get(name), raw)?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Option '{name}' accumulated to {value:?}.");
        }

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn push_unconsumed(&mut self, token: &str) {
        self.remainder.push(token.to_string());
    }

    fn close(self, positional_only: &[&str]) -> OptionMatches {
        let OptionMatcher {
            values,
            mut remainder,
            ..
        } = self;
        remainder.extend(positional_only.iter().map(|t| t.to_string()));
        OptionMatches { values, remainder }
    }
}

/// Match `tokens` against the options of `spec`.
///
/// Tokens from the first `--` onwards bypass option matching entirely, and are appended (terminator included) to the remainder.
/// Before that, tokens are walked in pairs with one token of lookahead.
/// Options consume their values either from their own token or from the lookahead,
/// while non-option tokens are collected into the remainder via the lookahead of their predecessor.
/// Unknown options never fail the match; they are left in the remainder.
pub(crate) fn match_options(
    spec: &ActionSpec,
    tokens: &[&str],
) -> Result<OptionMatches, ParseError> {
    let terminator = tokens
        .iter()
        .position(|t| *t == TERMINATOR)
        .unwrap_or(tokens.len());
    let (scanned, positional_only) = tokens.split_at(terminator);
    let mut matcher = OptionMatcher::new(spec);

    // The first token is nobody's lookahead, so it needs to be collected explicitly.
    if let Some(first) = scanned.first() {
        if !is_option(first) {
            matcher.push_unconsumed(first);
        }
    }

    for (index, token) in scanned.iter().enumerate() {
        let lookahead = scanned.get(index + 1).copied();
        let lookahead_used = if is_long_option(token) {
            matcher.feed_long(token, lookahead)?
        } else if is_option(token) {
            matcher.feed_short(token, lookahead)?
        } else {
            false
        };

        if let Some(next) = lookahead {
            if !is_option(next) && !lookahead_used {
                matcher.push_unconsumed(next);
            }
        }
    }

    let option_matches = matcher.close(positional_only);

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Option remainder: {:?}.", option_matches.remainder);
    }

    Ok(option_matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{InvalidConversion, Mapper, OptionKind, Parameter};
    use rand::{thread_rng, Rng};
    use rstest::rstest;

    fn vc() -> ActionSpec {
        ActionSpec::new()
            .add(Parameter::option(
                "verbose",
                OptionSpec::count("v", None).unwrap(),
            ))
            .add(Parameter::option(
                "count",
                OptionSpec::key("c", None, Mapper::parse::<u32>()).unwrap(),
            ))
    }

    fn long() -> ActionSpec {
        ActionSpec::new()
            .add(Parameter::option(
                "long",
                OptionSpec::derived("long", OptionKind::Key(Mapper::identity())).unwrap(),
            ))
            .add(Parameter::option(
                "quiet",
                OptionSpec::derived("quiet", OptionKind::Flag).unwrap(),
            ))
            .add(Parameter::option(
                "verbose",
                OptionSpec::count(None, "verbose").unwrap(),
            ))
    }

    fn remainder(option_matches: &OptionMatches) -> Vec<&str> {
        option_matches
            .remainder
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn empty() {
        let tokens: &[&str] = &[];
        let option_matches = match_options(&vc(), tokens).unwrap();
        assert!(option_matches.values.is_empty());
        assert!(option_matches.remainder.is_empty());
    }

    #[test]
    fn counts_and_unknowns() {
        // Setup
        let spec = ActionSpec::new().add(Parameter::option(
            "verbose",
            OptionSpec::count("v", None).unwrap(),
        ));
        let tokens = ["-vvv", "-vv", "-v", "-t", "install", "package"];

        // Execute
        let option_matches = match_options(&spec, &tokens).unwrap();

        // Verify
        assert_eq!(option_matches.values.len(), 1);
        assert_eq!(
            option_matches.values["verbose"].downcast_ref::<usize>(),
            Some(&6)
        );
        assert_eq!(remainder(&option_matches), vec!["-t", "install", "package"]);
    }

    #[test]
    fn count_regardless_of_clustering() {
        let spec = vc();

        for _ in 0..100 {
            // Setup
            let occurrences: usize = thread_rng().gen_range(1..30);
            let mut tokens: Vec<String> = Vec::default();
            let mut left = occurrences;

            while left > 0 {
                let cluster = thread_rng().gen_range(1..=left);
                tokens.push(format!("-{}", "v".repeat(cluster)));
                left -= cluster;
            }

            let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();

            // Execute
            let option_matches = match_options(&spec, &tokens).unwrap();

            // Verify
            assert_eq!(
                option_matches.values["verbose"].downcast_ref::<usize>(),
                Some(&occurrences),
                "{tokens:?}"
            );
            assert!(option_matches.remainder.is_empty());
        }
    }

    #[rstest]
    #[case(vec!["-vvvvvvc32"], 6, 32)]
    #[case(vec!["-vvvvvvc", "32"], 6, 32)]
    #[case(vec!["-c32", "-v"], 1, 32)]
    #[case(vec!["-c", "32", "-v"], 1, 32)]
    #[case(vec!["-v", "-c", "07"], 1, 7)]
    fn short_cluster(#[case] tokens: Vec<&str>, #[case] verbose: usize, #[case] count: u32) {
        let option_matches = match_options(&vc(), &tokens).unwrap();
        assert_eq!(
            option_matches.values["verbose"].downcast_ref::<usize>(),
            Some(&verbose)
        );
        assert_eq!(
            option_matches.values["count"].downcast_ref::<u32>(),
            Some(&count)
        );
        assert!(option_matches.remainder.is_empty());
    }

    #[test]
    fn short_greedy_value() {
        // Setup
        let spec = ActionSpec::new()
            .add(Parameter::option(
                "verbose",
                OptionSpec::count("v", "verbose").unwrap(),
            ))
            .add(Parameter::option(
                "name",
                OptionSpec::key("n", "name", Mapper::identity()).unwrap(),
            ));

        // Execute
        let option_matches = match_options(&spec, &["-nvvvvvv"]).unwrap();

        // Verify
        assert!(!option_matches.values.contains_key("verbose"));
        assert_eq!(
            option_matches.values["name"].downcast_ref::<String>().unwrap(),
            "vvvvvv"
        );
    }

    #[rstest]
    #[case(vec!["--long=--since=forgotten"], "--since=forgotten")]
    #[case(vec!["--long", "since=forgotten"], "since=forgotten")]
    #[case(vec!["--long="], "")]
    #[case(vec!["-l-long-"], "-long-")]
    fn long_value(#[case] tokens: Vec<&str>, #[case] expected: &str) {
        let option_matches = match_options(&long(), &tokens).unwrap();
        assert_eq!(
            option_matches.values["long"].downcast_ref::<String>().unwrap(),
            expected
        );
        assert!(option_matches.remainder.is_empty());
    }

    #[test]
    fn long_flags() {
        let option_matches =
            match_options(&long(), &["--verbose", "--quiet", "--verbose"]).unwrap();
        assert_eq!(
            option_matches.values["verbose"].downcast_ref::<usize>(),
            Some(&2)
        );
        assert_eq!(
            option_matches.values["quiet"].downcast_ref::<bool>(),
            Some(&true)
        );
    }

    #[rstest]
    #[case(vec!["-c"], "-c")]
    #[case(vec!["-vc"], "-c")]
    #[case(vec!["-c", "-v"], "-c")]
    #[case(vec!["-c", "--", "32"], "-c")]
    fn short_missing_value(#[case] tokens: Vec<&str>, #[case] option: &str) {
        assert_eq!(
            match_options(&vc(), &tokens).unwrap_err(),
            ParseError::MissingOptionValue(option.to_string())
        );
    }

    #[rstest]
    #[case(vec!["--long"])]
    #[case(vec!["--long", "--quiet"])]
    fn long_missing_value(#[case] tokens: Vec<&str>) {
        assert_eq!(
            match_options(&long(), &tokens).unwrap_err(),
            ParseError::MissingOptionValue("--long".to_string())
        );
    }

    #[rstest]
    #[case(vec!["--quiet=yes"], "--quiet")]
    #[case(vec!["--verbose="], "--verbose")]
    fn long_unexpected_value(#[case] tokens: Vec<&str>, #[case] option: &str) {
        assert_eq!(
            match_options(&long(), &tokens).unwrap_err(),
            ParseError::UnexpectedOptionValue(option.to_string())
        );
    }

    #[rstest]
    #[case(vec!["-c1", "-c2"])]
    #[case(vec!["-c", "1", "-vc2"])]
    fn duplicate_key(#[case] tokens: Vec<&str>) {
        assert_eq!(
            match_options(&vc(), &tokens).unwrap_err(),
            ParseError::DuplicateKey("-c".to_string())
        );
    }

    #[rstest]
    #[case(vec!["-c1", "-cabc"])]
    #[case(vec!["-c", "1", "-vcabc"])]
    fn duplicate_key_invalid_value(#[case] tokens: Vec<&str>) {
        assert_eq!(
            match_options(&vc(), &tokens).unwrap_err(),
            ParseError::InvalidConversion(InvalidConversion::InvalidConversion {
                token: "abc".to_string(),
                type_name: "u32",
            })
        );
    }

    #[test]
    fn invalid_value() {
        assert_eq!(
            match_options(&vc(), &["-cabc"]).unwrap_err(),
            ParseError::InvalidConversion(InvalidConversion::InvalidConversion {
                token: "abc".to_string(),
                type_name: "u32",
            })
        );
    }

    #[rstest]
    // The first token is collected directly, later ones through the lookahead.
    #[case(vec!["install"], vec!["install"])]
    #[case(vec!["install", "package"], vec!["install", "package"])]
    #[case(vec!["-v", "install"], vec!["install"])]
    #[case(vec!["install", "-v", "package"], vec!["install", "package"])]
    #[case(vec!["-c", "32", "install"], vec!["install"])]
    #[case(vec!["-c32", "install"], vec!["install"])]
    #[case(vec!["33", "88", "77", "-v"], vec!["33", "88", "77"])]
    // Unknown options are left over: short ones whole, long ones without their dashes.
    #[case(vec!["-t", "x"], vec!["-t", "x"])]
    #[case(vec!["-vt"], vec!["-t"])]
    #[case(vec!["-vtv"], vec!["-tv"])]
    #[case(vec!["--since=forgotten"], vec!["since=forgotten"])]
    #[case(vec!["--unknown", "x"], vec!["unknown", "x"])]
    #[case(vec!["-", "x"], vec!["-", "x"])]
    // Past the terminator, nothing is an option.
    #[case(vec!["--", "-v"], vec!["--", "-v"])]
    #[case(vec!["a", "--", "-c", "--"], vec!["a", "--", "-c", "--"])]
    #[case(vec!["-v", "--"], vec!["--"])]
    fn remainders(#[case] tokens: Vec<&str>, #[case] expected: Vec<&str>) {
        let option_matches = match_options(&vc(), &tokens).unwrap();
        assert_eq!(remainder(&option_matches), expected);
    }

    #[test]
    fn terminator_bypasses_options() {
        let option_matches = match_options(&vc(), &["-v", "--", "-v", "-c"]).unwrap();
        assert_eq!(
            option_matches.values["verbose"].downcast_ref::<usize>(),
            Some(&1)
        );
        assert!(!option_matches.values.contains_key("count"));
        assert_eq!(remainder(&option_matches), vec!["--", "-v", "-c"]);
    }

    #[test]
    fn spec_unchanged() {
        // Setup
        let spec = vc();
        let tokens = ["-vvc32", "x"];

        // Execute
        let first = match_options(&spec, &tokens).unwrap();
        let second = match_options(&spec, &tokens).unwrap();

        // Verify
        assert_eq!(format!("{:?}", first.values), format!("{:?}", second.values));
        assert_eq!(first.remainder, second.remainder);
    }
}
