//! Sequential credential trials against one target.

use std::fmt;
use std::sync::Arc;

use futures::Stream;
use futures::StreamExt;
use tracing::debug;
use tracing::info;
use tracing::instrument;

use crate::client::ClientFactory;
use crate::target::Target;
use crate::wordlist::Credential;
use crate::Error;

/// Result of trying one credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Authenticated,
    Rejected,
    ConnectionError,
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttemptOutcome::Authenticated => "authenticated",
            AttemptOutcome::Rejected => "rejected",
            AttemptOutcome::ConnectionError => "connection error",
        };
        f.write_str(s)
    }
}

/// Tries credentials one at a time until one authenticates.
#[derive(Clone)]
pub struct BruteForcer {
    client_factory: Arc<dyn ClientFactory>,
}

impl BruteForcer {
    #[must_use]
    pub fn new(client_factory: Arc<dyn ClientFactory>) -> Self {
        Self { client_factory }
    }

    /// Consumes `credentials` in order and returns the first one that
    /// authenticates, or [`None`] once the stream is exhausted.
    ///
    /// Rejections and connection errors never stop the loop; nothing after
    /// a successful credential is pulled from the stream.
    ///
    /// # Errors
    ///
    /// If the credential stream itself yields an error.
    #[instrument(skip_all, fields(%target))]
    pub async fn run<S>(
        &self,
        target: &Target,
        credentials: S,
    ) -> Result<Option<Credential>, Error>
    where
        S: Stream<Item = Result<Credential, Error>>,
    {
        let mut credentials = std::pin::pin!(credentials);
        let mut attempts = 0_usize;

        while let Some(credential) = credentials.next().await {
            let credential = credential?;
            attempts += 1;

            if self.attempt(target, &credential).await == AttemptOutcome::Authenticated {
                info!(attempts, user = %credential.user, "credential found");
                return Ok(Some(credential));
            }
        }

        info!(attempts, "credentials exhausted");
        Ok(None)
    }

    /// Runs one full connect, authenticate, disconnect cycle on a fresh
    /// client.
    async fn attempt(&self, target: &Target, credential: &Credential) -> AttemptOutcome {
        let mut client = self.client_factory.client(target);

        if let Err(error) = client.connect().await {
            debug!(user = %credential.user, ?error, "ssh connect failed");
            return AttemptOutcome::ConnectionError;
        }

        let outcome = match client.authenticate(credential).await {
            Ok(true) => AttemptOutcome::Authenticated,
            Ok(false) => AttemptOutcome::Rejected,
            Err(error) => {
                debug!(user = %credential.user, ?error, "ssh authentication errored");
                AttemptOutcome::ConnectionError
            }
        };

        if let Err(error) = client.disconnect().await {
            debug!(?error, "failed closing ssh session");
        }

        debug!(user = %credential.user, %outcome, "attempt finished");
        outcome
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use anyhow::bail;
    use anyhow::Result;
    use async_trait::async_trait;
    use camino::Utf8PathBuf;

    use super::*;
    use crate::client::Client;

    /// Lifecycle events observed by [`MockFactory`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Connect(usize),
        Auth(usize, String, String),
        Disconnect(usize),
    }

    /// Client factory that accepts one credential and records everything.
    #[derive(Default)]
    pub struct MockFactory {
        accept: Option<Credential>,
        broken_users: HashSet<String>,
        events: Arc<Mutex<Vec<Event>>>,
        clients: Arc<Mutex<usize>>,
    }

    impl MockFactory {
        pub fn accepting(user: &str, password: &str) -> Self {
            Self {
                accept: Some(Credential::new(user, password)),
                ..Default::default()
            }
        }

        /// Authentication errors instead of answering for this user.
        pub fn break_auth_for(mut self, user: &str) -> Self {
            self.broken_users.insert(user.to_owned());
            self
        }

        pub fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        pub fn attempts(&self) -> Vec<(String, String)> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    Event::Auth(_, user, password) => Some((user, password)),
                    _ => None,
                })
                .collect()
        }

        pub fn clients_built(&self) -> usize {
            *self.clients.lock().unwrap()
        }
    }

    impl ClientFactory for MockFactory {
        fn client(&self, _target: &Target) -> Box<dyn Client> {
            let mut clients = self.clients.lock().unwrap();
            *clients += 1;
            Box::new(MockClient {
                id: *clients,
                accept: self.accept.clone(),
                broken_users: self.broken_users.clone(),
                events: self.events.clone(),
            })
        }
    }

    struct MockClient {
        id: usize,
        accept: Option<Credential>,
        broken_users: HashSet<String>,
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl MockClient {
        fn record(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[async_trait]
    impl Client for MockClient {
        async fn connect(&mut self) -> Result<()> {
            self.record(Event::Connect(self.id));
            Ok(())
        }

        async fn authenticate(&mut self, credential: &Credential) -> Result<bool> {
            self.record(Event::Auth(
                self.id,
                credential.user.clone(),
                credential.password.clone(),
            ));
            if self.broken_users.contains(&credential.user) {
                bail!("connection reset by peer");
            }
            Ok(self.accept.as_ref() == Some(credential))
        }

        async fn disconnect(&mut self) -> Result<()> {
            self.record(Event::Disconnect(self.id));
            Ok(())
        }
    }

    fn credentials(lines: &[(&str, &str)]) -> Vec<Result<Credential, Error>> {
        lines
            .iter()
            .map(|(user, password)| Ok(Credential::new(*user, *password)))
            .collect()
    }

    fn target() -> Target {
        Target::builder().host("10.0.0.5").build()
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let factory = Arc::new(MockFactory::accepting("admin", "correct"));
        let forcer = BruteForcer::new(factory.clone());
        let input = credentials(&[
            ("root", "toor"),
            ("admin", "admin123"),
            ("admin", "correct"),
            ("admin", "never-tried"),
        ]);

        let found = forcer
            .run(&target(), futures::stream::iter(input))
            .await
            .unwrap();

        assert_eq!(found, Some(Credential::new("admin", "correct")));
        assert_eq!(
            factory.attempts(),
            vec![
                ("root".into(), "toor".into()),
                ("admin".into(), "admin123".into()),
                ("admin".into(), "correct".into()),
            ]
        );
    }

    #[tokio::test]
    async fn exhausts_every_candidate_once_in_order() {
        let factory = Arc::new(MockFactory::default());
        let forcer = BruteForcer::new(factory.clone());
        let lines = [("a", "1"), ("b", "2"), ("a", "1"), ("c", "3")];

        let found = forcer
            .run(&target(), futures::stream::iter(credentials(&lines)))
            .await
            .unwrap();

        assert_eq!(found, None);
        let expected: Vec<(String, String)> = lines
            .iter()
            .map(|(u, p)| ((*u).to_owned(), (*p).to_owned()))
            .collect();
        assert_eq!(factory.attempts(), expected);
    }

    #[tokio::test]
    async fn fresh_client_per_attempt_and_always_disconnected() {
        let factory = Arc::new(MockFactory::accepting("c", "3"));
        let forcer = BruteForcer::new(factory.clone());
        let lines = [("a", "1"), ("b", "2"), ("c", "3")];

        forcer
            .run(&target(), futures::stream::iter(credentials(&lines)))
            .await
            .unwrap();

        assert_eq!(factory.clients_built(), 3);
        assert_eq!(
            factory.events(),
            vec![
                Event::Connect(1),
                Event::Auth(1, "a".into(), "1".into()),
                Event::Disconnect(1),
                Event::Connect(2),
                Event::Auth(2, "b".into(), "2".into()),
                Event::Disconnect(2),
                Event::Connect(3),
                Event::Auth(3, "c".into(), "3".into()),
                Event::Disconnect(3),
            ]
        );
    }

    #[tokio::test]
    async fn connection_errors_do_not_abort() {
        let factory = Arc::new(
            MockFactory::accepting("admin", "correct")
                .break_auth_for("root")
                .break_auth_for("guest"),
        );
        let forcer = BruteForcer::new(factory.clone());
        let lines = [("root", "toor"), ("guest", "guest"), ("admin", "correct")];

        let found = forcer
            .run(&target(), futures::stream::iter(credentials(&lines)))
            .await
            .unwrap();

        assert_eq!(found, Some(Credential::new("admin", "correct")));
        assert_eq!(factory.attempts().len(), 3);
    }

    #[tokio::test]
    async fn failed_connect_skips_auth() {
        let factory = Arc::new(FailingConnectFactory::default());
        let forcer = BruteForcer::new(factory.clone());
        let lines = [("root", "toor"), ("admin", "admin")];

        let found = forcer
            .run(&target(), futures::stream::iter(credentials(&lines)))
            .await
            .unwrap();

        assert_eq!(found, None);
        assert_eq!(*factory.connects.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn source_error_stops_the_run() {
        let factory = Arc::new(MockFactory::accepting("admin", "correct"));
        let forcer = BruteForcer::new(factory.clone());
        let input = vec![
            Ok(Credential::new("root", "toor")),
            Err(Error::WordlistRead {
                path: Utf8PathBuf::from("creds.txt"),
                source: std::io::ErrorKind::InvalidData.into(),
            }),
            Ok(Credential::new("admin", "correct")),
        ];

        let error = forcer
            .run(&target(), futures::stream::iter(input))
            .await
            .unwrap_err();

        assert!(error.is_wordlist());
        assert_eq!(factory.attempts().len(), 1);
    }

    #[derive(Default)]
    struct FailingConnectFactory {
        connects: Arc<Mutex<usize>>,
    }

    impl ClientFactory for FailingConnectFactory {
        fn client(&self, _target: &Target) -> Box<dyn Client> {
            Box::new(FailingConnectClient {
                connects: self.connects.clone(),
            })
        }
    }

    struct FailingConnectClient {
        connects: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl Client for FailingConnectClient {
        async fn connect(&mut self) -> Result<()> {
            *self.connects.lock().unwrap() += 1;
            bail!("connection refused");
        }

        async fn authenticate(&mut self, _credential: &Credential) -> Result<bool> {
            panic!("authenticate called without a session");
        }

        async fn disconnect(&mut self) -> Result<()> {
            panic!("disconnect called without a session");
        }
    }
}
