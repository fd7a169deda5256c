use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// A directory shown in the folder browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    pub path: PathBuf,
    pub name: String,
    pub children: Vec<DirNode>,
}

impl DirNode {
    fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path: path.to_path_buf(),
            name,
            children: Vec::new(),
        }
    }

    /// Every directory below `root`, sorted by name. Directories that
    /// cannot be read are left out.
    pub fn build(root: &Path) -> Self {
        let mut stack = vec![DirNode::new(root)];

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_type().is_dir());

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping directory: {}", err);
                    continue;
                }
            };
            while stack.len() > entry.depth() {
                fold(&mut stack);
            }
            stack.push(DirNode::new(entry.path()));
        }

        while stack.len() > 1 {
            fold(&mut stack);
        }
        stack.pop().unwrap_or_else(|| DirNode::new(root))
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(DirNode::count).sum::<usize>()
    }
}

fn fold(stack: &mut Vec<DirNode>) {
    if let Some(node) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
        }
    }
}
