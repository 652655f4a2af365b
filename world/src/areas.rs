use super::types::{PortalId, SectorId};
use super::util::to_render_point_f;
use super::world::World;
use log::{info, warn};
use math::{Pnt3f, Vec3f};

/// Slack added to every area box so faces on the sector boundary fall inside it.
const AREA_PADDING: f32 = 0.01;

/// Visibility region for one sector.
#[derive(Clone, Debug, PartialEq)]
pub struct Area {
    pub sector: SectorId,
    pub position: Pnt3f,
    pub size: Vec3f,
    pub reference_point: Pnt3f,
}

/// Opening between two areas, stored once per mirrored portal pair.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaPortal {
    pub areas: [SectorId; 2],
    pub portal: PortalId,
    pub winding: Vec<Pnt3f>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Areas {
    pub areas: Vec<Area>,
    pub portals: Vec<AreaPortal>,
}

impl World {
    /// Builds one area per sector and links them through portals, in renderer coordinates.
    pub fn build_areas(&mut self, unit_scale: f64) -> Areas {
        let areas: Vec<Area> = self
            .sectors
            .iter()
            .enumerate()
            .map(|(i_sector, sector)| Area {
                sector: i_sector,
                position: sector.bounds.center(),
                size: sector.bounds.size() + Vec3f::new(AREA_PADDING, AREA_PADDING, AREA_PADDING),
                reference_point: sector.centroid,
            })
            .collect();

        for portal in &mut self.portals {
            portal.marked = false;
        }

        let mut portals = Vec::new();
        for i_sector in 0..self.sectors.len() {
            for i_portal in 0..self.sectors[i_sector].portals.len() {
                let portal_id = self.sectors[i_sector].portals[i_portal];
                if self.portals[portal_id].marked {
                    continue;
                }
                let to_sector = self.portals[portal_id].to_sector;
                let next = match self.sectors.get(to_sector) {
                    Some(next) => next,
                    None => {
                        warn!(
                            "Portal {} of sector {} leads to missing sector {}.",
                            portal_id, i_sector, to_sector
                        );
                        continue;
                    }
                };
                for &next_portal in &next.portals {
                    if self.portals[next_portal].to_sector == i_sector {
                        self.portals[next_portal].marked = true;
                    }
                }

                let winding = self.portals[portal_id]
                    .winding
                    .iter()
                    .map(|&point| to_render_point_f(point, unit_scale))
                    .collect();
                portals.push(AreaPortal {
                    areas: [i_sector, to_sector],
                    portal: portal_id,
                    winding,
                });
            }
        }

        info!(
            "Built {} areas and {} area portals.",
            areas.len(),
            portals.len()
        );
        Areas { areas, portals }
    }
}
