// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// The network is generic over burn's Backend; the CLI pins it here.
//
//   InferBackend   → Wgpu            (predict, describe)
//   LossBackend    → Autodiff<Wgpu>  (loss + backward pass)
//
// Tests use NdArray instead so they run without a GPU.

pub type InferBackend = burn::backend::Wgpu;
pub type LossBackend  = burn::backend::Autodiff<InferBackend>;

pub fn default_device() -> burn::backend::wgpu::WgpuDevice {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    device
}
