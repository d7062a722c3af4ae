//! `TraciEngine`: a [`SimulationEngine`] backed by a `sumo` child process.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use ct_core::{GeoPoint, LaneId, SimPosition, VehicleId};

use crate::{EngineError, EngineResult, SimulationEngine};

use super::codec::{Storage, frame, get_payload, put_f64, put_i32};
use super::*;

// ── Connection ────────────────────────────────────────────────────────────────

/// Largest response accepted.  Id lists of big networks run to a few MB.
const MAX_MESSAGE_LEN: usize = 64 * 1024 * 1024;

/// How long a drop waits for the simulator to acknowledge the close.
const DROP_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Request/response exchange over any byte stream.
pub(crate) struct Connection<S> {
    stream: S,
}

impl<S: Read + Write> Connection<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self { stream }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> S {
        self.stream
    }

    /// Send one command and return the full response body.
    fn request(&mut self, id: u8, payload: &[u8]) -> EngineResult<Vec<u8>> {
        self.stream.write_all(&frame(id, payload))?;
        self.stream.flush()?;

        let mut len_buf = [0u8; 4];
        self.stream.read_exact(&mut len_buf)?;
        let total = i32::from_be_bytes(len_buf);
        if total < 4 || total as usize > MAX_MESSAGE_LEN {
            return Err(EngineError::Protocol(format!("message length {total} out of range")));
        }
        let mut body = vec![0u8; total as usize - 4];
        self.stream.read_exact(&mut body)?;
        Ok(body)
    }

    /// Issue a getter and hand the value (cursor on its type tag) to `read`.
    fn get<T>(
        &mut self,
        id: u8,
        var: u8,
        object: &str,
        params: &[u8],
        read: impl FnOnce(&mut Storage<'_>) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let body = self.request(id, &get_payload(var, object, params))?;
        let mut storage = Storage::new(&body);
        storage.read_status(id)?;
        storage.read_get_header(id, var)?;
        read(&mut storage)
    }

    pub(crate) fn get_double(&mut self, id: u8, var: u8, object: &str) -> EngineResult<f64> {
        self.get(id, var, object, &[], |s| {
            s.expect_type(TYPE_DOUBLE)?;
            s.read_f64()
        })
    }

    pub(crate) fn get_int(&mut self, id: u8, var: u8, object: &str) -> EngineResult<i32> {
        self.get(id, var, object, &[], |s| {
            s.expect_type(TYPE_INTEGER)?;
            s.read_i32()
        })
    }

    pub(crate) fn get_string(&mut self, id: u8, var: u8, object: &str) -> EngineResult<String> {
        self.get(id, var, object, &[], |s| {
            s.expect_type(TYPE_STRING)?;
            s.read_string()
        })
    }

    pub(crate) fn get_string_list(&mut self, id: u8, var: u8) -> EngineResult<Vec<String>> {
        self.get(id, var, "", &[], |s| {
            s.expect_type(TYPE_STRINGLIST)?;
            s.read_string_list()
        })
    }

    pub(crate) fn get_position(&mut self, object: &str) -> EngineResult<SimPosition> {
        self.get(CMD_GET_VEHICLE_VARIABLE, VAR_POSITION, object, &[], |s| {
            s.expect_type(POSITION_2D)?;
            Ok(SimPosition::new(s.read_f64()?, s.read_f64()?))
        })
    }

    pub(crate) fn convert_geo(&mut self, position: SimPosition) -> EngineResult<GeoPoint> {
        let mut params = Vec::with_capacity(26);
        params.push(TYPE_COMPOUND);
        put_i32(&mut params, 2);
        params.push(POSITION_2D);
        put_f64(&mut params, position.x);
        put_f64(&mut params, position.y);
        params.push(TYPE_UBYTE);
        params.push(POSITION_LON_LAT);

        self.get(CMD_GET_SIM_VARIABLE, VAR_POSITION_CONVERSION, "", &params, |s| {
            s.expect_type(POSITION_LON_LAT)?;
            Ok(GeoPoint::new(s.read_f64()?, s.read_f64()?))
        })
    }

    /// Advance one step.  Subscription results are not used and ignored.
    pub(crate) fn step(&mut self) -> EngineResult<()> {
        let mut payload = Vec::with_capacity(8);
        put_f64(&mut payload, 0.0);
        let body = self.request(CMD_SIMSTEP, &payload)?;
        let mut storage = Storage::new(&body);
        storage.read_status(CMD_SIMSTEP)
    }

    /// Returns `(api_version, version_string)`.
    pub(crate) fn version(&mut self) -> EngineResult<(i32, String)> {
        let body = self.request(CMD_GETVERSION, &[])?;
        let mut storage = Storage::new(&body);
        storage.read_status(CMD_GETVERSION)?;
        storage.read_length()?;
        let id = storage.read_u8()?;
        if id != CMD_GETVERSION {
            return Err(EngineError::Protocol(format!("version response id 0x{id:02x}")));
        }
        Ok((storage.read_i32()?, storage.read_string()?))
    }

    pub(crate) fn close(&mut self) -> EngineResult<()> {
        let body = self.request(CMD_CLOSE, &[])?;
        Storage::new(&body).read_status(CMD_CLOSE)
    }
}

impl Connection<TcpStream> {
    /// Close, giving up on the acknowledgement after `timeout`.
    pub(crate) fn close_within(&mut self, timeout: Duration) -> EngineResult<()> {
        self.stream.set_read_timeout(Some(timeout))?;
        self.close()
    }
}

// ── TraciEngine ───────────────────────────────────────────────────────────────

struct Session {
    conn:  Connection<TcpStream>,
    child: Child,
}

/// Launches `sumo` per phase and drives it over a local TCP socket.
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = TraciEngine::new("sumo");
/// engine.start(Path::new("scenario/osm.sumocfg"))?;
/// while engine.min_expected_remaining()? > 0 {
///     engine.simulation_step()?;
/// }
/// engine.close()?;
/// ```
pub struct TraciEngine {
    binary:           PathBuf,
    extra_args:       Vec<String>,
    connect_attempts: u32,
    retry_delay:      Duration,
    session:          Option<Session>,
}

impl TraciEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary:           binary.into(),
            extra_args:       Vec::new(),
            connect_attempts: 60,
            retry_delay:      Duration::from_millis(100),
            session:          None,
        }
    }

    /// Extra command-line arguments appended after the configuration.
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// How often, and how far apart, to retry connecting after launch.
    pub fn connect_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.connect_attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    fn conn(&mut self) -> EngineResult<&mut Connection<TcpStream>> {
        self.session.as_mut().map(|s| &mut s.conn).ok_or(EngineError::NotStarted)
    }

    fn connect(&self, port: u16, child: &mut Child) -> EngineResult<TcpStream> {
        for attempt in 1..=self.connect_attempts {
            match TcpStream::connect((Ipv4Addr::LOCALHOST, port)) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => {
                    debug!(port, attempt, error = %e, "simulator not accepting yet");
                    if let Some(status) = child.try_wait()? {
                        return Err(EngineError::ExitedEarly(status));
                    }
                    thread::sleep(self.retry_delay);
                }
            }
        }
        Err(EngineError::Connect { port, attempts: self.connect_attempts })
    }
}

/// Ask the OS for a currently unused local port.
fn free_port() -> EngineResult<u16> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    Ok(listener.local_addr()?.port())
}

impl SimulationEngine for TraciEngine {
    fn start(&mut self, config: &Path) -> EngineResult<()> {
        if self.session.is_some() {
            return Err(EngineError::AlreadyStarted);
        }
        let port = free_port()?;
        let mut child = Command::new(&self.binary)
            .arg("-c")
            .arg(config)
            .arg("--remote-port")
            .arg(port.to_string())
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        let stream = match self.connect(port, &mut child) {
            Ok(s) => s,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };
        let mut conn = Connection::new(stream);
        let (api, version) = conn.version()?;
        info!(config = %config.display(), port, api, %version, "simulator connected");

        self.session = Some(Session { conn, child });
        Ok(())
    }

    fn close(&mut self) -> EngineResult<()> {
        let Some(mut session) = self.session.take() else {
            return Err(EngineError::NotStarted);
        };
        let result = session.conn.close();
        drop(session.conn);
        match session.child.wait() {
            Ok(status) if !status.success() => warn!(%status, "simulator exited abnormally"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to reap simulator process"),
        }
        result
    }

    fn simulation_step(&mut self) -> EngineResult<()> {
        self.conn()?.step()
    }

    fn min_expected_remaining(&mut self) -> EngineResult<i32> {
        self.conn()?.get_int(CMD_GET_SIM_VARIABLE, VAR_MIN_EXPECTED_VEHICLES, "")
    }

    fn current_time(&mut self) -> EngineResult<f64> {
        self.conn()?.get_double(CMD_GET_SIM_VARIABLE, VAR_TIME, "")
    }

    fn lane_ids(&mut self) -> EngineResult<Vec<LaneId>> {
        let ids = self.conn()?.get_string_list(CMD_GET_LANE_VARIABLE, ID_LIST)?;
        Ok(ids.into_iter().map(LaneId::from).collect())
    }

    fn vehicle_ids(&mut self) -> EngineResult<Vec<VehicleId>> {
        let ids = self.conn()?.get_string_list(CMD_GET_VEHICLE_VARIABLE, ID_LIST)?;
        Ok(ids.into_iter().map(VehicleId::from).collect())
    }

    fn vehicle_position(&mut self, vehicle: &VehicleId) -> EngineResult<SimPosition> {
        self.conn()?.get_position(vehicle.as_str())
    }

    fn vehicle_speed(&mut self, vehicle: &VehicleId) -> EngineResult<f64> {
        self.conn()?.get_double(CMD_GET_VEHICLE_VARIABLE, VAR_SPEED, vehicle.as_str())
    }

    fn vehicle_road_id(&mut self, vehicle: &VehicleId) -> EngineResult<String> {
        self.conn()?.get_string(CMD_GET_VEHICLE_VARIABLE, VAR_ROAD_ID, vehicle.as_str())
    }

    fn vehicle_lane_id(&mut self, vehicle: &VehicleId) -> EngineResult<LaneId> {
        let lane = self.conn()?.get_string(CMD_GET_VEHICLE_VARIABLE, VAR_LANE_ID, vehicle.as_str())?;
        Ok(LaneId::from(lane))
    }

    fn project_to_geo(&mut self, position: SimPosition) -> EngineResult<GeoPoint> {
        self.conn()?.convert_geo(position)
    }
}

impl Drop for TraciEngine {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            let _ = session.conn.close_within(DROP_CLOSE_TIMEOUT);
            let _ = session.child.kill();
            let _ = session.child.wait();
        }
    }
}
