// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/vault.rs

use crate::downloader::UrlDownloader;
use crate::error::VaultError;
use crate::host::{HostRegistry, ImageHost};
use crate::image::{
    FetchType, PrepareAction, ProgressMonitor, ProgressPhase, Query, QueryType, VMImage,
    VMImageInfo, VaultRecord,
};
use crate::integrity::{self, XzImageDecoder};
use crate::layout::{self, DeleteOnFailure, VaultLayout};
use crate::{platform, records};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

type FetchResult = Result<VMImage, VaultError>;

/// Handle to a pending prepared-image build. Cloned to every caller waiting
/// on the same image id; all of them observe the same result.
type FetchFuture = Shared<BoxFuture<'static, FetchResult>>;

/// Everything the vault mutex protects: both catalogs and the in-progress
/// fetch map. The mutex is held only for map access and catalog writes,
/// never across download, hash, extract, prepare or copy work.
struct VaultState {
    prepared: HashMap<String, VaultRecord>,
    instances: HashMap<String, VaultRecord>,
    in_progress: HashMap<String, FetchFuture>,
}

/// What an alias fetch should do, decided in one critical section so that a
/// caller observing no in-progress entry is guaranteed no concurrent build
/// exists for that id.
enum AliasPlan {
    Join(FetchFuture),
    Reuse(VMImage),
    Build(FetchFuture),
}

/// Content-addressed cache and provisioning layer for VM images.
///
/// Turns image queries (alias, URL, or local file) into ready-to-boot
/// artifacts, deduplicates concurrent fetches of the same image, and owns
/// two persistent catalogs: shared prepared images under the cache root and
/// per-instance working copies under the data root.
pub struct ImageVault {
    registry: HostRegistry,
    downloader: Arc<dyn UrlDownloader>,
    layout: VaultLayout,
    expiry: Duration,
    state: Mutex<VaultState>,
}

impl ImageVault {
    /// Load both catalogs (best-effort) and ensure the on-disk subtrees
    /// exist. `expiry` bounds how long an unused, non-persistent cached
    /// alias image survives `prune_expired_images`.
    pub fn new(
        hosts: Vec<Arc<dyn ImageHost>>,
        downloader: Arc<dyn UrlDownloader>,
        cache_root: &Path,
        data_root: &Path,
        expiry: Duration,
    ) -> Result<Self, VaultError> {
        let layout = VaultLayout::new(cache_root, data_root);
        layout.ensure()?;

        let prepared = records::load_records(&layout.image_db_path());
        let instances = records::load_records(&layout.instance_db_path());
        tracing::debug!(
            prepared = prepared.len(),
            instances = instances.len(),
            "loaded image record catalogs"
        );

        Ok(ImageVault {
            registry: HostRegistry::new(hosts),
            downloader,
            layout,
            expiry,
            state: Mutex::new(VaultState {
                prepared,
                instances,
                in_progress: HashMap::new(),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, VaultState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Produce the image artifacts for a query.
    ///
    /// A query naming an already-materialized instance returns that
    /// instance's image without any I/O. Otherwise the query is served from
    /// the prepared-image cache when possible, or fetched from its source:
    /// downloaded and hash-verified for aliases, downloaded for URLs,
    /// copied or extracted for local files. `prepare` runs once per fetched
    /// source image; its output is what instances are cloned from.
    pub async fn fetch_image(
        &self,
        fetch_type: FetchType,
        query: &Query,
        prepare: &PrepareAction,
        monitor: &ProgressMonitor,
    ) -> FetchResult {
        {
            let state = self.state();
            if let Some(record) = state.instances.get(&query.name) {
                return Ok(record.image.clone());
            }
        }

        if query.query_type == QueryType::Alias {
            self.fetch_alias_image(fetch_type, query, prepare, monitor).await
        } else {
            self.fetch_url_image(fetch_type, query, prepare, monitor).await
        }
    }

    /// Drop an instance's record and its working directory.
    pub fn remove(&self, name: &str) -> Result<(), VaultError> {
        {
            let state = self.state();
            if !state.instances.contains_key(name) {
                return Ok(());
            }
        }

        let instance_dir = self.layout.instance_dir(name);
        if instance_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&instance_dir) {
                tracing::warn!(instance = name, error = %e, "cannot remove instance directory");
            }
        }

        let mut state = self.state();
        state.instances.remove(name);
        self.persist_instance_records(&state)?;
        Ok(())
    }

    /// Whether an instance record exists. Pure catalog lookup.
    pub fn has_record_for(&self, name: &str) -> bool {
        self.state().instances.contains_key(name)
    }

    /// Whether a prepared image is cached under the given key.
    pub fn has_prepared_image(&self, key: &str) -> bool {
        self.state().prepared.contains_key(key)
    }

    /// Evict cached alias images that are not persistent and have not been
    /// handed out within the expiry window. File removal failures are
    /// logged; the records are erased regardless.
    pub fn prune_expired_images(&self) -> Result<(), VaultError> {
        let now = SystemTime::now();
        let expired: Vec<(String, PathBuf, String)> = {
            let state = self.state();
            state
                .prepared
                .iter()
                .filter(|(_, record)| {
                    record.query.query_type == QueryType::Alias
                        && !record.query.persistent
                        && record.last_accessed + self.expiry <= now
                })
                .map(|(key, record)| {
                    (
                        key.clone(),
                        record.image.image_path.clone(),
                        record.query.release.clone(),
                    )
                })
                .collect()
        };

        for (_, image_path, release) in &expired {
            tracing::info!(release = %release, "source image expired, removing it from the cache");
            if image_path.exists() {
                if let Some(dir) = image_path.parent() {
                    if let Err(e) = std::fs::remove_dir_all(dir) {
                        tracing::warn!(
                            dir = %dir.display(),
                            error = %e,
                            "cannot remove expired image directory"
                        );
                    }
                }
            }
        }

        let mut state = self.state();
        for (key, _, _) in &expired {
            state.prepared.remove(key);
        }
        self.persist_image_records(&state)?;
        Ok(())
    }

    /// Re-fetch every cached alias image whose stored key no longer matches
    /// the id its host currently reports. The stored query is replayed
    /// verbatim; per-record failures are logged and skipped.
    pub async fn update_images(
        &self,
        fetch_type: FetchType,
        prepare: &PrepareAction,
        monitor: &ProgressMonitor,
    ) -> Result<(), VaultError> {
        let candidates: Vec<(String, Query)> = {
            let state = self.state();
            state
                .prepared
                .iter()
                .filter(|(key, record)| {
                    // Keys that start with the queried release are full-hash
                    // queries; those never go stale by alias movement.
                    record.query.query_type == QueryType::Alias
                        && !key.starts_with(&record.query.release)
                })
                .map(|(key, record)| (key.clone(), record.query.clone()))
                .collect()
        };

        for (key, query) in candidates {
            let info = match self.registry.info_for(&query) {
                Ok(info) => info,
                Err(e) => {
                    tracing::warn!(release = %query.release, error = %e, "cannot check image for updates");
                    continue;
                }
            };
            if info.id == key {
                continue;
            }

            tracing::info!(release = %query.release, "updating source image to latest");
            if let Err(e) = self.fetch_image(fetch_type, &query, prepare, monitor).await {
                tracing::warn!(release = %query.release, error = %e, "failed to update image");
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Alias fetches
    // -----------------------------------------------------------------------

    async fn fetch_alias_image(
        &self,
        fetch_type: FetchType,
        query: &Query,
        prepare: &PrepareAction,
        monitor: &ProgressMonitor,
    ) -> FetchResult {
        let info = self.registry.info_for(query)?;

        if !platform::is_remote_supported(&query.remote_name) {
            return Err(VaultError::UnsupportedRemote(query.remote_name.clone()));
        }
        if !platform::is_alias_supported(&query.release, &query.remote_name) {
            return Err(VaultError::UnsupportedAlias(query.release.clone()));
        }

        let id = info.id.clone();
        let mut allow_reuse = true;

        loop {
            let plan =
                self.alias_fetch_plan(&id, &info, query, fetch_type, prepare, monitor, allow_reuse)?;
            match plan {
                AliasPlan::Join(future) => {
                    monitor(ProgressPhase::Waiting, -1);
                    let prepared = future.await?;
                    {
                        let mut state = self.state();
                        // A previous failure may have left no record behind.
                        if let Some(record) = state.prepared.get_mut(&id) {
                            record.last_accessed = SystemTime::now();
                        }
                    }
                    return self.finalize_image_records(query, &prepared);
                }

                AliasPlan::Reuse(prepared) => {
                    match self.finalize_image_records(query, &prepared) {
                        Ok(image) => return Ok(image),
                        Err(e) => {
                            tracing::warn!(error = %e, "cannot create instance image, fetching a fresh copy");
                            allow_reuse = false;
                        }
                    }
                }

                AliasPlan::Build(future) => {
                    let result = future.await;
                    let prepared = {
                        let mut state = self.state();
                        state.in_progress.remove(&id);
                        match result {
                            Ok(prepared) => {
                                state.prepared.insert(
                                    id.clone(),
                                    VaultRecord {
                                        image: prepared.clone(),
                                        query: query.clone(),
                                        last_accessed: SystemTime::now(),
                                    },
                                );
                                prepared
                            }
                            Err(e) => return Err(e),
                        }
                    };
                    return self.finalize_image_records(query, &prepared);
                }
            }
        }
    }

    /// One critical section deciding how to serve an alias fetch: join an
    /// in-flight build, reuse a cached prepared image, or register a new
    /// build. The in-progress entry is inserted before the lock is released.
    #[allow(clippy::too_many_arguments)]
    fn alias_fetch_plan(
        &self,
        id: &str,
        info: &VMImageInfo,
        query: &Query,
        fetch_type: FetchType,
        prepare: &PrepareAction,
        monitor: &ProgressMonitor,
        allow_reuse: bool,
    ) -> Result<AliasPlan, VaultError> {
        let mut state = self.state();

        if let Some(future) = state.in_progress.get(id) {
            return Ok(AliasPlan::Join(future.clone()));
        }

        if allow_reuse && !query.name.is_empty() {
            for (key, record) in state.prepared.iter_mut() {
                if record.query.remote_name != query.remote_name {
                    continue;
                }
                if key.as_str() == id || record.image.aliases.iter().any(|a| *a == query.release) {
                    record.last_accessed = SystemTime::now();
                    return Ok(AliasPlan::Reuse(record.image.clone()));
                }
            }
        }

        let image_dir = self
            .layout
            .make_image_dir(&layout::alias_image_dir_name(&info.release, &info.version))?;
        let source_image = VMImage {
            image_path: image_dir.join(layout::filename_for(&info.image_location)),
            id: id.to_string(),
            original_release: info.release_title.clone(),
            aliases: info.aliases.clone(),
            ..Default::default()
        };

        let future = spawn_prepared_image_build(
            Arc::clone(&self.downloader),
            fetch_type,
            info.clone(),
            source_image,
            image_dir,
            Arc::clone(prepare),
            Arc::clone(monitor),
        );
        state.in_progress.insert(id.to_string(), future.clone());
        Ok(AliasPlan::Build(future))
    }

    // -----------------------------------------------------------------------
    // URL and local-file fetches
    // -----------------------------------------------------------------------

    async fn fetch_url_image(
        &self,
        fetch_type: FetchType,
        query: &Query,
        prepare: &PrepareAction,
        monitor: &ProgressMonitor,
    ) -> FetchResult {
        if !platform::is_image_url_supported() {
            return Err(VaultError::UnsupportedScheme(
                "http and file based images are not supported on this platform".to_string(),
            ));
        }

        if query.query_type == QueryType::LocalFile {
            self.fetch_local_file_image(fetch_type, query, prepare, monitor).await
        } else {
            self.fetch_http_image(fetch_type, query, prepare, monitor).await
        }
    }

    async fn fetch_local_file_image(
        &self,
        fetch_type: FetchType,
        query: &Query,
        prepare: &PrepareAction,
        monitor: &ProgressMonitor,
    ) -> FetchResult {
        let path = local_file_path(&query.release);
        if !path.exists() {
            return Err(VaultError::NotFound(format!(
                "custom image `{}` does not exist",
                path.display()
            )));
        }

        let source_image = VMImage {
            image_path: path,
            ..Default::default()
        };
        let mut source_image = if is_xz(&source_image.image_path) {
            self.extract_image_from(&query.name, &source_image, monitor)?
        } else {
            self.image_instance_from(&query.name, &source_image)?
        };

        if fetch_type == FetchType::ImageKernelAndInitrd {
            let info = self.registry.info_for(&default_kernel_query(&query.name))?;
            let image_dir = source_image
                .image_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            source_image = fetch_kernel_and_initrd(
                self.downloader.as_ref(),
                &info,
                source_image,
                &image_dir,
                monitor,
            )
            .await?;
        }

        let vm_image = prepare(source_image.clone())?;
        remove_source_images(&source_image, &vm_image);

        let mut state = self.state();
        state.instances.insert(
            query.name.clone(),
            VaultRecord {
                image: vm_image.clone(),
                query: query.clone(),
                last_accessed: SystemTime::now(),
            },
        );
        self.persist_instance_records(&state)?;
        Ok(vm_image)
    }

    async fn fetch_http_image(
        &self,
        fetch_type: FetchType,
        query: &Query,
        prepare: &PrepareAction,
        monitor: &ProgressMonitor,
    ) -> FetchResult {
        let url = query.release.clone();
        let key = integrity::sha256_hex_bytes(url.as_bytes());
        let last_modified = self.downloader.last_modified(&url).await?;
        let release_date = last_modified.map(|t| t.to_rfc2822()).unwrap_or_default();

        // Unlike alias fetches, URL fetches are not deduplicated against
        // in-flight builds; concurrent callers may each download.
        enum HttpSource {
            Unchanged(VMImage),
            Redownload(VMImage),
            Fresh,
        }

        let existing = {
            let mut state = self.state();
            match state.prepared.get_mut(&key) {
                Some(record) => {
                    if !release_date.is_empty() && record.image.release_date == release_date {
                        record.last_accessed = SystemTime::now();
                        HttpSource::Unchanged(record.image.clone())
                    } else {
                        HttpSource::Redownload(record.image.clone())
                    }
                }
                None => HttpSource::Fresh,
            }
        };

        let mut source_image = match existing {
            HttpSource::Unchanged(prepared) => {
                return self.finalize_image_records(query, &prepared);
            }
            HttpSource::Redownload(stale) => stale,
            HttpSource::Fresh => {
                let filename = layout::filename_for(&url);
                let image_dir = self
                    .layout
                    .make_image_dir(&layout::http_image_dir_name(&filename, last_modified))?;
                VMImage {
                    image_path: image_dir.join(&filename),
                    id: key.clone(),
                    ..Default::default()
                }
            }
        };

        let mut image_guard = DeleteOnFailure::new(source_image.image_path.clone());
        self.downloader
            .download_to(&url, &source_image.image_path, 0, ProgressPhase::Image, monitor)
            .await?;

        if fetch_type == FetchType::ImageKernelAndInitrd {
            let info = self.registry.info_for(&default_kernel_query(&query.name))?;
            let image_dir = source_image
                .image_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            source_image = fetch_kernel_and_initrd(
                self.downloader.as_ref(),
                &info,
                source_image,
                &image_dir,
                monitor,
            )
            .await?;
        }

        if is_xz(&source_image.image_path) {
            source_image = extract_downloaded_image(source_image, monitor)?;
        }

        let mut prepared = prepare(source_image.clone())?;
        prepared.release_date = release_date;
        remove_source_images(&source_image, &prepared);
        image_guard.commit();

        {
            let mut state = self.state();
            state.prepared.insert(
                key,
                VaultRecord {
                    image: prepared.clone(),
                    query: query.clone(),
                    last_accessed: SystemTime::now(),
                },
            );
            self.persist_image_records(&state)?;
        }

        if query.name.is_empty() {
            return Ok(prepared);
        }

        let vm_image = self.image_instance_from(&query.name, &prepared)?;
        let mut state = self.state();
        state.instances.insert(
            query.name.clone(),
            VaultRecord {
                image: vm_image.clone(),
                query: query.clone(),
                last_accessed: SystemTime::now(),
            },
        );
        self.persist_instance_records(&state)?;
        Ok(vm_image)
    }

    // -----------------------------------------------------------------------
    // Instance materialization
    // -----------------------------------------------------------------------

    /// Clone a prepared image into an instance's directory. For a metadata
    /// resolution (empty name) no copy is made and an empty image is
    /// returned; otherwise the new instance record is inserted. Both
    /// catalogs are persisted either way.
    fn finalize_image_records(&self, query: &Query, prepared: &VMImage) -> FetchResult {
        let vm_image = if query.name.is_empty() {
            VMImage::default()
        } else {
            self.image_instance_from(&query.name, prepared)?
        };

        let mut state = self.state();
        if !query.name.is_empty() {
            state.instances.insert(
                query.name.clone(),
                VaultRecord {
                    image: vm_image.clone(),
                    query: query.clone(),
                    last_accessed: SystemTime::now(),
                },
            );
        }
        self.persist_instance_records(&state)?;
        self.persist_image_records(&state)?;
        Ok(vm_image)
    }

    /// Copy a prepared image's artifacts into `<instances>/<name>/`,
    /// preserving file names. The copies inherit the source's identity but
    /// carry no aliases of their own.
    fn image_instance_from(&self, name: &str, prepared: &VMImage) -> FetchResult {
        let output_dir = self.layout.make_instance_dir(name)?;
        Ok(VMImage {
            image_path: copy_into(&prepared.image_path, &output_dir)?,
            kernel_path: copy_into(&prepared.kernel_path, &output_dir)?,
            initrd_path: copy_into(&prepared.initrd_path, &output_dir)?,
            id: prepared.id.clone(),
            original_release: prepared.original_release.clone(),
            current_release: prepared.current_release.clone(),
            release_date: prepared.release_date.clone(),
            aliases: vec![],
        })
    }

    /// Extract a local `.xz` image straight into the instance's directory,
    /// leaving the source file in place.
    fn extract_image_from(
        &self,
        name: &str,
        source: &VMImage,
        monitor: &ProgressMonitor,
    ) -> FetchResult {
        let output_dir = self.layout.make_instance_dir(name)?;
        let file_name = source
            .image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let image_name = file_name.strip_suffix(".xz").unwrap_or(&file_name).to_string();
        let image_path = output_dir.join(image_name);

        XzImageDecoder::new(&source.image_path).decode_to(&image_path, monitor)?;

        let mut image = source.clone();
        image.image_path = image_path;
        Ok(image)
    }

    fn persist_image_records(&self, state: &VaultState) -> Result<(), VaultError> {
        records::persist_records(&state.prepared, &self.layout.image_db_path())
    }

    fn persist_instance_records(&self, state: &VaultState) -> Result<(), VaultError> {
        records::persist_records(&state.instances, &self.layout.instance_db_path())
    }
}

// ---------------------------------------------------------------------------
// Prepared-image builds
// ---------------------------------------------------------------------------

/// Spawn the download/verify/extract/prepare work onto the runtime and wrap
/// it in a shareable future. Every error surfaces to all waiters as the same
/// `CreateImage` failure.
fn spawn_prepared_image_build(
    downloader: Arc<dyn UrlDownloader>,
    fetch_type: FetchType,
    info: VMImageInfo,
    source_image: VMImage,
    image_dir: PathBuf,
    prepare: PrepareAction,
    monitor: ProgressMonitor,
) -> FetchFuture {
    let task = tokio::spawn(async move {
        build_prepared_image(
            downloader,
            fetch_type,
            info,
            source_image,
            image_dir,
            prepare,
            monitor,
        )
        .await
        .map_err(|e| VaultError::CreateImage(e.to_string()))
    });

    async move {
        match task.await {
            Ok(result) => result,
            Err(e) => Err(VaultError::CreateImage(format!("image build task failed: {e}"))),
        }
    }
    .boxed()
    .shared()
}

async fn build_prepared_image(
    downloader: Arc<dyn UrlDownloader>,
    fetch_type: FetchType,
    info: VMImageInfo,
    mut source_image: VMImage,
    image_dir: PathBuf,
    prepare: PrepareAction,
    monitor: ProgressMonitor,
) -> FetchResult {
    let mut image_guard = DeleteOnFailure::new(source_image.image_path.clone());

    downloader
        .download_to(
            &info.image_location,
            &source_image.image_path,
            info.size,
            ProgressPhase::Image,
            &monitor,
        )
        .await?;

    monitor(ProgressPhase::Verify, -1);
    integrity::verify_image(&source_image.image_path, &source_image.id)?;

    if fetch_type == FetchType::ImageKernelAndInitrd {
        source_image =
            fetch_kernel_and_initrd(downloader.as_ref(), &info, source_image, &image_dir, &monitor)
                .await?;
    }

    if is_xz(&source_image.image_path) {
        source_image = extract_downloaded_image(source_image, &monitor)?;
    }

    let prepared = prepare(source_image.clone())?;
    remove_source_images(&source_image, &prepared);
    image_guard.commit();
    Ok(prepared)
}

async fn fetch_kernel_and_initrd(
    downloader: &dyn UrlDownloader,
    info: &VMImageInfo,
    mut image: VMImage,
    image_dir: &Path,
    monitor: &ProgressMonitor,
) -> FetchResult {
    image.kernel_path = image_dir.join(layout::filename_for(&info.kernel_location));
    image.initrd_path = image_dir.join(layout::filename_for(&info.initrd_location));

    let mut kernel_guard = DeleteOnFailure::new(image.kernel_path.clone());
    let mut initrd_guard = DeleteOnFailure::new(image.initrd_path.clone());
    downloader
        .download_to(
            &info.kernel_location,
            &image.kernel_path,
            -1,
            ProgressPhase::Kernel,
            monitor,
        )
        .await?;
    downloader
        .download_to(
            &info.initrd_location,
            &image.initrd_path,
            -1,
            ProgressPhase::Initrd,
            monitor,
        )
        .await?;
    kernel_guard.commit();
    initrd_guard.commit();
    Ok(image)
}

/// Replace a downloaded `.xz` payload with its extracted form, dropping the
/// compressed file once extraction has succeeded.
fn extract_downloaded_image(source: VMImage, monitor: &ProgressMonitor) -> FetchResult {
    let compressed = source.image_path.clone();
    let extracted = compressed.with_extension("");

    XzImageDecoder::new(&compressed).decode_to(&extracted, monitor)?;
    delete_file(&compressed);

    let mut image = source;
    image.image_path = extracted;
    Ok(image)
}

/// The prepare phase may have been a no-op; only remove source artifacts it
/// actually replaced.
fn remove_source_images(source: &VMImage, prepared: &VMImage) {
    if source.image_path != prepared.image_path {
        delete_file(&source.image_path);
    }
    if source.kernel_path != prepared.kernel_path {
        delete_file(&source.kernel_path);
    }
    if source.initrd_path != prepared.initrd_path {
        delete_file(&source.initrd_path);
    }
}

fn delete_file(path: &Path) {
    if !path.as_os_str().is_empty() {
        let _ = std::fs::remove_file(path);
    }
}

fn copy_into(file: &Path, output_dir: &Path) -> Result<PathBuf, VaultError> {
    if file.as_os_str().is_empty() {
        return Ok(PathBuf::new());
    }
    if !file.exists() {
        return Err(VaultError::Io(format!("{} missing", file.display())));
    }
    let file_name = file
        .file_name()
        .ok_or_else(|| VaultError::Io(format!("{} has no file name", file.display())))?;
    let new_path = output_dir.join(file_name);
    std::fs::copy(file, &new_path).map_err(|e| {
        VaultError::Io(format!(
            "cannot copy {} into {}: {e}",
            file.display(),
            output_dir.display()
        ))
    })?;
    Ok(new_path)
}

fn is_xz(path: &Path) -> bool {
    path.extension().map(|ext| ext == "xz").unwrap_or(false)
}

fn local_file_path(release: &str) -> PathBuf {
    PathBuf::from(release.strip_prefix("file://").unwrap_or(release))
}

fn default_kernel_query(name: &str) -> Query {
    Query {
        name: name.to_string(),
        release: "default".to_string(),
        persistent: false,
        remote_name: String::new(),
        query_type: QueryType::Alias,
    }
}
