//! 🌍 Environments: the three stages every microservice lives through.
//!
//! 🎬 *[a dev quota, a qa quota and a master quota walk into a config file]*
//! *[only one of them bothered to show up. the other two copy its homework.]*
//!
//! Deployment configs speak `dev`/`qa`/`master`. The token catalog speaks
//! `dev`/`uat`/`prd`. Same places, different dialects. This module is the
//! phrasebook, and it is a closed enum so the compiler yells when someone
//! invents a fourth environment. 🦆

use std::fmt;

/// 🎯 A deployment environment, as named in the microservice configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Environment {
    Dev,
    Qa,
    Master,
}

impl Environment {
    /// 🔄 The fixed walk order. Env ids are handed out in exactly this order.
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Qa, Environment::Master];

    /// 📛 The tag used in configs (`resQuotas<tag>`) and in the env directory table.
    pub fn tag(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Qa => "qa",
            Environment::Master => "master",
        }
    }

    /// 🔑 The suffix the token catalog glues onto token base names.
    pub fn token_suffix(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Qa => "uat",
            Environment::Master => "prd",
        }
    }

    /// 📦 Position inside [`Environment::ALL`], handy for fixed-size arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Environment::Dev => 0,
            Environment::Qa => 1,
            Environment::Master => 2,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_qa_secretly_goes_by_uat() {
        assert_eq!(Environment::Dev.token_suffix(), "dev");
        assert_eq!(Environment::Qa.token_suffix(), "uat");
        assert_eq!(Environment::Master.token_suffix(), "prd");
    }

    #[test]
    fn the_one_where_the_walk_order_never_changes() {
        let tags: Vec<&str> = Environment::ALL.iter().map(|env| env.tag()).collect();
        assert_eq!(tags, vec!["dev", "qa", "master"]);
        for (position, env) in Environment::ALL.iter().enumerate() {
            assert_eq!(env.index(), position);
        }
    }
}
