// SPDX-License-Identifier: Apache-2.0

mod config;
mod decide;
mod normalize;
mod rhel;

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;

use crate::{
    CommandOutput, CommandRunner, HostExec, KernelModules, NetReconciler,
    NetconvConfig, NetconvError, OsFamily, RawInterface,
};

pub(crate) const TEST_IFACE: &str = "salttest0";

/// Records every command instead of running it.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeHost {
    commands: Rc<RefCell<Vec<String>>>,
    loaded_modules: Rc<RefCell<HashSet<String>>>,
    failing_program: Rc<RefCell<Option<String>>>,
    /// Program, file and content written when that program runs, like a
    /// hook editing the config behind our back.
    rewrite_on_run: Rc<RefCell<Option<(String, PathBuf, String)>>>,
}

impl CommandRunner for FakeHost {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput, NetconvError> {
        self.commands
            .borrow_mut()
            .push(format!("{program} {}", args.join(" ")));
        if let Some((p, path, content)) = self.rewrite_on_run.borrow().as_ref()
        {
            if p == program {
                std::fs::write(path, content).unwrap();
            }
        }
        if self.failing_program.borrow().as_deref() == Some(program) {
            Ok(CommandOutput::new(1, "", "device not found"))
        } else {
            Ok(CommandOutput::success())
        }
    }
}

impl KernelModules for FakeHost {
    fn is_loaded(&self, name: &str) -> Result<bool, NetconvError> {
        Ok(self.loaded_modules.borrow().contains(name))
    }

    fn load(&self, name: &str) -> Result<(), NetconvError> {
        self.commands.borrow_mut().push(format!("modprobe {name}"));
        self.loaded_modules.borrow_mut().insert(name.to_string());
        Ok(())
    }
}

impl FakeHost {
    pub(crate) fn exec(&self) -> HostExec {
        HostExec::new(Box::new(self.clone()), Box::new(self.clone()))
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub(crate) fn clear_commands(&self) {
        self.commands.borrow_mut().clear();
    }

    pub(crate) fn fail_on(&self, program: &str) {
        *self.failing_program.borrow_mut() = Some(program.to_string());
    }

    pub(crate) fn rewrite_on(&self, program: &str, path: &Path, content: &str) {
        *self.rewrite_on_run.borrow_mut() = Some((
            program.to_string(),
            path.to_path_buf(),
            content.to_string(),
        ));
    }
}

pub(crate) struct TestHost {
    pub(crate) root: TempDir,
    pub(crate) fake: FakeHost,
    pub(crate) reconciler: NetReconciler,
}

impl TestHost {
    pub(crate) fn new(os_family: OsFamily) -> Self {
        Self::with_verify(os_family, true)
    }

    pub(crate) fn with_verify(os_family: OsFamily, verify: bool) -> Self {
        let root = TempDir::new().unwrap();
        let fake = FakeHost::default();
        let mut config = NetconvConfig::new(os_family).with_root(root.path());
        config.no_verify = !verify;
        let reconciler =
            NetReconciler::new_with_exec(&config, fake.exec()).unwrap();
        Self {
            root,
            fake,
            reconciler,
        }
    }

    pub(crate) fn path(&self, host_path: &str) -> PathBuf {
        self.root.path().join(host_path.trim_start_matches('/'))
    }

    pub(crate) fn write(&self, host_path: &str, content: &str) {
        let path = self.path(host_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub(crate) fn read(&self, host_path: &str) -> String {
        std::fs::read_to_string(self.path(host_path)).unwrap()
    }

    pub(crate) fn exists(&self, host_path: &str) -> bool {
        Path::new(&self.path(host_path)).exists()
    }

    /// Interface `salttest0` desired with given proto and enabled flag.
    pub(crate) fn iface(
        &self,
        enabled: bool,
        proto: &str,
    ) -> crate::InterfaceSpec {
        let mut raw = RawInterface::new(TEST_IFACE, "eth");
        raw.enabled = Some(enabled);
        raw.proto = Some(proto.to_string());
        self.reconciler.normalize_interface(raw).unwrap()
    }
}
