//! The command registry and one handler per supported FTP verb.
//!
//! Handlers are uniform values behind the [`CommandHandler`] trait. The
//! [`Registry`] maps upper-cased tokens to handlers behind a reader-writer
//! lock, so embedders can add or swap commands at runtime without a
//! restart.

mod abor;
mod allo;
mod appe;
mod auth;
mod cdup;
mod clnt;
mod cwd;
mod dele;
mod eprt;
mod epsv;
mod feat;
mod list;
mod mdtm;
mod mkd;
mod mlsx;
mod mode;
mod nlst;
mod noop;
mod opts;
mod pass;
mod pasv;
mod pbsz;
mod port;
mod prot;
mod pwd;
mod quit;
mod rein;
mod rest;
mod retr;
mod rmd;
mod rnfr;
mod rnto;
mod site;
mod size;
mod stat;
mod stor;
mod stou;
mod stru;
mod syst;
mod type_;
mod user;

pub use self::{
    abor::Abor, allo::Allo, appe::Appe, auth::Auth, cdup::Cdup, clnt::Clnt, cwd::Cwd, dele::Dele, eprt::Eprt, epsv::Epsv, feat::Feat, list::List,
    mdtm::Mdtm, mkd::Mkd, mlsx::{Mlsd, Mlst}, mode::Mode, nlst::Nlst, noop::Noop, opts::Opts, pass::Pass, pasv::Pasv, pbsz::Pbsz, port::Port,
    prot::Prot, pwd::Pwd, quit::Quit, rein::Rein, rest::Rest, retr::Retr, rmd::Rmd, rnfr::Rnfr, rnto::Rnto, site::Site, size::Size, stat::Stat,
    stor::Stor, stou::Stou, stru::Stru, syst::Syst, type_::Type, user::User,
};

use async_trait::async_trait;
use std::{
    collections::HashMap,
    fmt::Debug,
    io,
    sync::{Arc, PoisonError, RwLock},
};

use crate::server::Session;

/// A handler for one FTP verb.
///
/// `execute` encodes its protocol side effects as reply codes written to
/// the session and as driver calls. The three capability methods drive the
/// dispatch gates and the FEAT reply.
#[async_trait]
pub trait CommandHandler: Send + Sync + Debug {
    /// Handles one occurrence of the command.
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()>;

    /// Listed in the FEAT reply when true.
    fn is_extension(&self) -> bool {
        false
    }

    /// The engine replies `553` when true and the parameter is empty.
    fn requires_param(&self) -> bool {
        false
    }

    /// The engine replies `530` when true and no user has logged in.
    fn requires_auth(&self) -> bool {
        true
    }
}

/// The token to handler mapping consulted on every dispatch.
///
/// Dispatch takes a read lock per lookup; [`Registry::replace`] takes the
/// write lock, so a privileged admin operation may swap handlers while the
/// server runs.
#[derive(Debug, Default)]
pub struct Registry {
    commands: RwLock<HashMap<String, Arc<dyn CommandHandler>>>,
}

impl Registry {
    pub(crate) fn new(commands: HashMap<String, Arc<dyn CommandHandler>>) -> Registry {
        Registry {
            commands: RwLock::new(commands),
        }
    }

    /// Looks the token up, returning a handle the caller can invoke after
    /// the lock is released.
    pub fn get(&self, token: &str) -> Option<Arc<dyn CommandHandler>> {
        let commands = self.commands.read().unwrap_or_else(PoisonError::into_inner);
        commands.get(token).cloned()
    }

    /// Adds or replaces the handler for a token at runtime.
    pub fn replace(&self, token: &str, handler: Arc<dyn CommandHandler>) {
        let mut commands = self.commands.write().unwrap_or_else(PoisonError::into_inner);
        commands.insert(token.to_ascii_uppercase(), handler);
    }

    /// The sorted tokens whose handlers are FEAT extensions.
    pub(crate) fn extensions(&self) -> Vec<String> {
        let commands = self.commands.read().unwrap_or_else(PoisonError::into_inner);
        let mut tokens: Vec<String> = commands.iter().filter(|(_, h)| h.is_extension()).map(|(t, _)| t.clone()).collect();
        tokens.sort();
        tokens
    }
}

/// The verb set a freshly constructed server supports.
pub fn default_commands() -> HashMap<String, Arc<dyn CommandHandler>> {
    let mut commands: HashMap<String, Arc<dyn CommandHandler>> = HashMap::new();
    let mut insert = |token: &str, handler: Arc<dyn CommandHandler>| {
        commands.insert(token.to_string(), handler);
    };

    insert("ABOR", Arc::new(Abor));
    insert("ALLO", Arc::new(Allo));
    insert("APPE", Arc::new(Appe));
    insert("AUTH", Arc::new(Auth));
    insert("CLNT", Arc::new(Clnt));
    insert("DELE", Arc::new(Dele));
    insert("EPRT", Arc::new(Eprt));
    insert("EPSV", Arc::new(Epsv));
    insert("FEAT", Arc::new(Feat));
    insert("LIST", Arc::new(List));
    insert("MDTM", Arc::new(Mdtm));
    insert("MLSD", Arc::new(Mlsd));
    insert("MLST", Arc::new(Mlst));
    insert("MODE", Arc::new(Mode));
    insert("NLST", Arc::new(Nlst));
    insert("NOOP", Arc::new(Noop));
    insert("OPTS", Arc::new(Opts));
    insert("PASS", Arc::new(Pass));
    insert("PASV", Arc::new(Pasv));
    insert("PBSZ", Arc::new(Pbsz));
    insert("PORT", Arc::new(Port));
    insert("PROT", Arc::new(Prot));
    insert("QUIT", Arc::new(Quit));
    insert("REIN", Arc::new(Rein));
    insert("REST", Arc::new(Rest));
    insert("RETR", Arc::new(Retr));
    insert("RNFR", Arc::new(Rnfr));
    insert("RNTO", Arc::new(Rnto));
    insert("SITE", Arc::new(Site));
    insert("SIZE", Arc::new(Size));
    insert("STAT", Arc::new(Stat));
    insert("STOR", Arc::new(Stor));
    insert("STOU", Arc::new(Stou));
    insert("STRU", Arc::new(Stru));
    insert("SYST", Arc::new(Syst));
    insert("TYPE", Arc::new(Type));
    insert("USER", Arc::new(User));

    // RFC 775 aliases share their primary's handler.
    let cwd: Arc<dyn CommandHandler> = Arc::new(Cwd);
    insert("CWD", cwd.clone());
    insert("XCWD", cwd);
    let cdup: Arc<dyn CommandHandler> = Arc::new(Cdup);
    insert("CDUP", cdup.clone());
    insert("XCUP", cdup);
    let pwd: Arc<dyn CommandHandler> = Arc::new(Pwd);
    insert("PWD", pwd.clone());
    insert("XPWD", pwd);
    let mkd: Arc<dyn CommandHandler> = Arc::new(Mkd);
    insert("MKD", mkd.clone());
    insert("XMKD", mkd);
    let rmd: Arc<dyn CommandHandler> = Arc::new(Rmd);
    insert("RMD", rmd.clone());
    insert("XRMD", rmd);

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_lookups_are_by_exact_token() {
        let registry = Registry::new(default_commands());
        assert!(registry.get("USER").is_some());
        assert!(registry.get("XPWD").is_some());
        assert!(registry.get("user").is_none());
        assert!(registry.get("BOGUS").is_none());
    }

    #[derive(Debug)]
    struct Probe;

    #[async_trait]
    impl CommandHandler for Probe {
        async fn execute(&self, _sess: &mut Session, _param: &str) -> io::Result<()> {
            Ok(())
        }

        fn is_extension(&self) -> bool {
            true
        }

        fn requires_auth(&self) -> bool {
            false
        }
    }

    #[test]
    fn handlers_can_be_replaced_at_runtime() {
        let registry = Registry::new(default_commands());
        registry.replace("quit", Arc::new(Probe));
        let swapped = registry.get("QUIT").unwrap();
        assert!(swapped.is_extension());
        assert!(registry.extensions().contains(&"QUIT".to_string()));

        registry.replace("probe", Arc::new(Probe));
        assert!(registry.get("PROBE").is_some());
    }

    #[test]
    fn extension_tokens_are_sorted() {
        let registry = Registry::new(default_commands());
        let extensions = registry.extensions();
        assert_eq!(extensions, ["CLNT", "EPRT", "EPSV", "MDTM", "MLSD", "MLST", "REST", "SIZE"]);
    }
}
