//! Native performance counters via the Windows PDH subsystem.
//!
//! PDH owns the rate arithmetic for rate-type counters such as
//! `\PhysicalDisk(_Total)\Disk Transfers/sec`; this adapter only binds the
//! counter, collects, and reads back the formatted value.

use std::fmt;

use tracing::{debug, info};
use windows_sys::Win32::System::Performance::{
    PdhAddEnglishCounterW, PdhCloseQuery, PdhCollectQueryData, PdhGetFormattedCounterValue,
    PdhOpenQueryW, PDH_FMT_COUNTERVALUE, PDH_FMT_DOUBLE, PDH_HCOUNTER, PDH_HQUERY,
};

use crate::error::{Result, SamplerError};
use crate::statistic::PerformanceStatistic;

const ERROR_SUCCESS: u32 = 0;
const PDH_CSTATUS_NO_OBJECT: u32 = 0xC000_0BB8;
const PDH_CSTATUS_NO_COUNTER: u32 = 0xC000_0BB9;
const PDH_CSTATUS_NO_INSTANCE: u32 = 0x8000_07D1;
const PDH_CSTATUS_BAD_COUNTERNAME: u32 = 0xC000_0BC0;
const PDH_CSTATUS_INVALID_DATA: u32 = 0xC000_0BBA;
const PDH_INVALID_DATA: u32 = 0xC000_0BC6;

/// A category/counter/instance triple naming a native counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterPath {
    pub category: String,
    pub counter: String,
    pub instance: Option<String>,
}

impl CounterPath {
    pub fn new(category: &str, counter: &str, instance: Option<&str>) -> Self {
        Self {
            category: category.to_string(),
            counter: counter.to_string(),
            instance: instance.map(str::to_string),
        }
    }

    /// Total disk transfers per second across all physical disks.
    pub fn disk_transfers_per_second() -> Self {
        Self::new("PhysicalDisk", "Disk Transfers/sec", Some("_Total"))
    }

    fn to_wide(&self) -> Vec<u16> {
        self.to_string()
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect()
    }
}

impl fmt::Display for CounterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "\\{}({})\\{}", self.category, instance, self.counter),
            None => write!(f, "\\{}\\{}", self.category, self.counter),
        }
    }
}

/// A bound PDH query holding exactly one counter.
pub struct WindowsCounter {
    path: CounterPath,
    query: PDH_HQUERY,
    counter: PDH_HCOUNTER,
}

// SAFETY: PDH query and counter handles are not tied to the creating thread,
// and `&mut self` on every call serialises access to them.
unsafe impl Send for WindowsCounter {}

impl WindowsCounter {
    /// Binds to `path`. Fails if the counter does not exist on this host.
    pub fn new(path: CounterPath) -> Result<Self> {
        let wide_path = path.to_wide();

        // SAFETY: zeroed handles are the documented "no handle" value for PDH
        let mut query: PDH_HQUERY = unsafe { std::mem::zeroed() };
        let mut counter: PDH_HCOUNTER = unsafe { std::mem::zeroed() };

        // SAFETY: null data source selects live data; out-pointer is valid
        let status = unsafe { PdhOpenQueryW(std::ptr::null(), 0, &mut query) };
        if status != ERROR_SUCCESS {
            return Err(SamplerError::Native {
                operation: "PdhOpenQueryW",
                status,
            });
        }

        // SAFETY: query is open, wide_path is NUL-terminated and outlives the call
        let status = unsafe { PdhAddEnglishCounterW(query, wide_path.as_ptr(), 0, &mut counter) };
        if status != ERROR_SUCCESS {
            // SAFETY: query was successfully opened above
            unsafe { PdhCloseQuery(query) };
            return Err(match status {
                PDH_CSTATUS_NO_OBJECT
                | PDH_CSTATUS_NO_COUNTER
                | PDH_CSTATUS_NO_INSTANCE
                | PDH_CSTATUS_BAD_COUNTERNAME => SamplerError::CounterNotFound {
                    path: path.to_string(),
                    status,
                },
                _ => SamplerError::Native {
                    operation: "PdhAddEnglishCounterW",
                    status,
                },
            });
        }

        let bound = Self {
            path,
            query,
            counter,
        };

        // Rate counters need two collections before they yield a value
        bound.collect()?;
        info!("Bound native performance counter {}", bound.path);
        Ok(bound)
    }

    pub fn path(&self) -> &CounterPath {
        &self.path
    }

    fn collect(&self) -> Result<()> {
        // SAFETY: query handle stays open for the lifetime of self
        let status = unsafe { PdhCollectQueryData(self.query) };
        if status != ERROR_SUCCESS {
            return Err(SamplerError::Native {
                operation: "PdhCollectQueryData",
                status,
            });
        }
        Ok(())
    }
}

impl PerformanceStatistic for WindowsCounter {
    fn next_value(&mut self) -> Result<f32> {
        self.collect()?;

        // SAFETY: plain-data struct, all-zero is a valid bit pattern
        let mut value: PDH_FMT_COUNTERVALUE = unsafe { std::mem::zeroed() };
        // SAFETY: counter belongs to the open query; out-pointers are valid
        let status = unsafe {
            PdhGetFormattedCounterValue(
                self.counter,
                PDH_FMT_DOUBLE,
                std::ptr::null_mut(),
                &mut value,
            )
        };

        match status {
            ERROR_SUCCESS => {
                // SAFETY: PDH_FMT_DOUBLE selects the doubleValue member
                let reading = unsafe { value.Anonymous.doubleValue };
                Ok(reading as f32)
            }
            // Two collections within the same tick: no rate yet
            PDH_CSTATUS_INVALID_DATA | PDH_INVALID_DATA => {
                debug!("{} has no valid data yet, reporting 0", self.path);
                Ok(0.0)
            }
            status => Err(SamplerError::Native {
                operation: "PdhGetFormattedCounterValue",
                status,
            }),
        }
    }
}

impl Drop for WindowsCounter {
    fn drop(&mut self) {
        // SAFETY: closing the query also releases its counters
        unsafe { PdhCloseQuery(self.query) };
    }
}

impl fmt::Debug for WindowsCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowsCounter")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
