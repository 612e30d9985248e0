use std::sync::{Arc, LockResult, Mutex, MutexGuard};

use camino::{Utf8Path, Utf8PathBuf};
use postindex_lib::{
    artifact::{self, ArtifactError},
    CanonicalPost,
};
use tracing::{debug, info, warn};

pub type Snapshot = Arc<Vec<CanonicalPost>>;

// Let's keep the possible events simpler for our needs
#[derive(Debug, PartialEq)]
enum FsEvent {
    Rename,
    Edit,
    Create,
    Delete,
    Ignored,
    Unhandled(notify::EventKind),
}

impl From<notify::EventKind> for FsEvent {
    fn from(event_kind: notify::EventKind) -> Self {
        use notify::event::{
            AccessKind, AccessMode, CreateKind, DataChange, EventKind, ModifyKind, RemoveKind,
        };
        match event_kind {
            EventKind::Modify(ModifyKind::Name(_)) => Self::Rename,
            EventKind::Modify(ModifyKind::Data(DataChange::Content | DataChange::Any)) => {
                Self::Edit
            }
            EventKind::Remove(RemoveKind::File | RemoveKind::Any) => Self::Delete,
            EventKind::Create(CreateKind::File | CreateKind::Any) => Self::Create,
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => Self::Ignored,
            unhandled => Self::Unhandled(unhandled),
        }
    }
}

/// Holds the last load of the index artifact, good or bad.
pub struct Keeper {
    path: Utf8PathBuf,
    posts: Result<Snapshot, Arc<ArtifactError>>,
}

impl Keeper {
    pub fn new(path: &Utf8Path) -> Self {
        let mut keeper = Keeper {
            path: path.to_owned(),
            posts: Ok(Arc::default()),
        };
        keeper.reload();
        keeper
    }

    pub fn reload(&mut self) {
        self.posts = match artifact::load(&self.path) {
            Ok(posts) => {
                info!("Loaded {} posts from {}", posts.len(), self.path);
                Ok(Arc::new(posts))
            }
            Err(err) => {
                warn!("Index unavailable: {err}");
                Err(Arc::new(err))
            }
        };
    }

    /// The current collection. Callers keep their own handle, so a reload
    /// never changes a render in progress.
    pub fn posts(&self) -> Result<Snapshot, Arc<ArtifactError>> {
        self.posts.clone()
    }

    fn concerns(&self, path: &std::path::Path) -> bool {
        path.file_name()
            .and_then(std::ffi::OsStr::to_str)
            .is_some_and(|name| Some(name) == self.path.file_name())
    }
}

#[derive(Clone)]
pub struct ArcMutex(pub Arc<Mutex<Keeper>>);

impl ArcMutex {
    pub fn new(keeper: Keeper) -> Self {
        Self(Arc::new(Mutex::new(keeper)))
    }

    pub fn lock(&self) -> LockResult<MutexGuard<'_, Keeper>> {
        self.0.as_ref().lock()
    }
}

impl notify::EventHandler for ArcMutex {
    fn handle_event(&mut self, event: notify::Result<notify::Event>) {
        match event {
            Ok(notify::Event { kind, paths, .. }) => {
                let mut keeper = match self.lock() {
                    Ok(keeper) => keeper,
                    Err(err) => {
                        warn!("Failed to lock index during notify event: {err}");
                        return;
                    }
                };
                if !paths.iter().any(|path| keeper.concerns(path)) {
                    return;
                }
                match FsEvent::from(kind) {
                    FsEvent::Rename | FsEvent::Edit | FsEvent::Create | FsEvent::Delete => {
                        keeper.reload();
                    }
                    FsEvent::Ignored => (),
                    FsEvent::Unhandled(event) => debug!("unhandled watch event: {event:?}"),
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        }
    }
}
